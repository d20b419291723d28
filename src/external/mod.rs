pub mod data_source;
pub mod mysql_source;
