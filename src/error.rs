use crate::workflow::Step;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppErr>;

#[derive(Debug, Error)]
pub enum AppErr {
    /// 잘못된 사용자 입력. 입력 검증기 밖으로 나가지 않는다.
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("gave up after {attempts} invalid attempts")]
    RetriesExhausted { attempts: u32 },
    #[error("sql error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("stored value '{value}' in {table}.{column} is not an integer")]
    Format {
        table: String,
        column: String,
        value: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid identifier: '{0}'")]
    InvalidIdent(String),
    #[error("illegal workflow transition {from:?} -> {to:?}")]
    Transition { from: Step, to: Step },
}

impl AppErr {
    /// 입력 스트림이 닫혔는지 여부. 메뉴 루프 종료 조건으로 쓴다.
    pub fn is_eof(&self) -> bool {
        matches!(self, AppErr::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}
