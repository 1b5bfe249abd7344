use std::fmt::Display;

/// Non-empty text of at most `CAP` characters, like a `VARCHAR(CAP)` column.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VarChar<const CAP: usize> {
    data: String,
}

pub type Make = VarChar<32>;
pub type Model = VarChar<64>;
pub type FullName = VarChar<128>;
pub type Nationality = VarChar<24>;
pub type Airport = VarChar<5>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarCharErr {
    Empty,
    TooLong { capacity: usize, length: usize },
}

impl Display for VarCharErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarCharErr::Empty => write!(f, "entry must not be empty"),
            VarCharErr::TooLong { capacity, length } => {
                write!(f, "entry is {length} characters long, at most {capacity} allowed")
            }
        }
    }
}

impl<const CAP: usize> VarChar<CAP> {
    pub fn as_str(&self) -> &str {
        &self.data
    }
}

impl<const CAP: usize> Display for VarChar<CAP> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data)
    }
}

impl<const CAP: usize> TryFrom<&str> for VarChar<CAP> {
    type Error = VarCharErr;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err(VarCharErr::Empty);
        }
        // 바이트가 아닌 문자 수 기준
        let length = value.chars().count();
        if length > CAP {
            return Err(VarCharErr::TooLong {
                capacity: CAP,
                length,
            });
        }
        Ok(Self {
            data: value.to_string(),
        })
    }
}

impl<const CAP: usize> From<VarChar<CAP>> for rusqlite::types::Value {
    fn from(value: VarChar<CAP>) -> Self {
        rusqlite::types::Value::Text(value.data)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_trims_and_accepts() {
        let name = FullName::try_from("  Chesley Sullenberger ").unwrap();
        assert_eq!(name.as_str(), "Chesley Sullenberger");
    }

    #[test]
    fn test_empty() {
        assert_eq!(Make::try_from("   "), Err(VarCharErr::Empty));
        assert_eq!(Make::try_from(""), Err(VarCharErr::Empty));
    }

    #[test]
    fn test_capacity_counts_chars() {
        assert!(Airport::try_from("ICN").is_ok());
        assert!(Airport::try_from("인천공항역").is_ok());
        assert_eq!(
            Airport::try_from("LAXSFO"),
            Err(VarCharErr::TooLong {
                capacity: 5,
                length: 6
            })
        );
    }
}
