//! Language model and the fixed publication-language code set

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

/// Two-letter publication language codes, each with a display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum LanguageCode {
    Ar,
    Zh,
    En,
    Fr,
    De,
    El,
    It,
    Ja,
    Ko,
    La,
    Pt,
    Ru,
    Es,
    Sw,
}

impl LanguageCode {
    pub fn as_code(&self) -> &'static str {
        match self {
            LanguageCode::Ar => "AR",
            LanguageCode::Zh => "ZH",
            LanguageCode::En => "EN",
            LanguageCode::Fr => "FR",
            LanguageCode::De => "DE",
            LanguageCode::El => "EL",
            LanguageCode::It => "IT",
            LanguageCode::Ja => "JA",
            LanguageCode::Ko => "KO",
            LanguageCode::La => "LA",
            LanguageCode::Pt => "PT",
            LanguageCode::Ru => "RU",
            LanguageCode::Es => "ES",
            LanguageCode::Sw => "SW",
        }
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            LanguageCode::Ar => "Arabic",
            LanguageCode::Zh => "Chinese (Mandarin)",
            LanguageCode::En => "English",
            LanguageCode::Fr => "French",
            LanguageCode::De => "German",
            LanguageCode::El => "Greek",
            LanguageCode::It => "Italian",
            LanguageCode::Ja => "Japanese",
            LanguageCode::Ko => "Korean",
            LanguageCode::La => "Latin",
            LanguageCode::Pt => "Portuguese",
            LanguageCode::Ru => "Russian",
            LanguageCode::Es => "Spanish",
            LanguageCode::Sw => "Swahili",
        }
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        LanguageCode::En
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AR" => Ok(LanguageCode::Ar),
            "ZH" => Ok(LanguageCode::Zh),
            "EN" => Ok(LanguageCode::En),
            "FR" => Ok(LanguageCode::Fr),
            "DE" => Ok(LanguageCode::De),
            "EL" => Ok(LanguageCode::El),
            "IT" => Ok(LanguageCode::It),
            "JA" => Ok(LanguageCode::Ja),
            "KO" => Ok(LanguageCode::Ko),
            "LA" => Ok(LanguageCode::La),
            "PT" => Ok(LanguageCode::Pt),
            "RU" => Ok(LanguageCode::Ru),
            "ES" => Ok(LanguageCode::Es),
            "SW" => Ok(LanguageCode::Sw),
            _ => Err(format!("Invalid language code: {}", s)),
        }
    }
}

// SQLx conversion: stored as the two-letter code string
impl sqlx::Type<Postgres> for LanguageCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LanguageCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.trim().parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LanguageCode {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_code().to_string(), buf)
    }
}

/// Language record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    pub code: LanguageCode,
}

impl Language {
    pub fn label(&self) -> &'static str {
        self.code.label()
    }
}

/// Create language request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLanguage {
    #[serde(default)]
    pub code: LanguageCode,
}

/// Update language request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLanguage {
    pub code: LanguageCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trips() {
        for code in [
            LanguageCode::Ar,
            LanguageCode::Zh,
            LanguageCode::En,
            LanguageCode::Fr,
            LanguageCode::De,
            LanguageCode::El,
            LanguageCode::It,
            LanguageCode::Ja,
            LanguageCode::Ko,
            LanguageCode::La,
            LanguageCode::Pt,
            LanguageCode::Ru,
            LanguageCode::Es,
            LanguageCode::Sw,
        ] {
            assert_eq!(code.as_code().parse::<LanguageCode>().unwrap(), code);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!("XX".parse::<LanguageCode>().is_err());
        assert!("".parse::<LanguageCode>().is_err());
    }

    #[test]
    fn default_is_english() {
        assert_eq!(LanguageCode::default(), LanguageCode::En);
        assert_eq!(LanguageCode::default().label(), "English");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("fr".parse::<LanguageCode>().unwrap(), LanguageCode::Fr);
    }
}
