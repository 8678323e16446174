//! Built-in dialect profiles.

pub mod ansi;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;

pub use self::ansi::ANSI;
pub use self::mysql::MYSQL;
pub use self::oracle::ORACLE;
pub use self::postgres::POSTGRES;
pub use self::sqlite::SQLITE;
pub use self::sqlserver::SQLSERVER;
