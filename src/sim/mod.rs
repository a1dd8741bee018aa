pub mod embedding;
pub mod poignancy;
pub mod storage;
