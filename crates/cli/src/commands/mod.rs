pub mod compare;
pub mod init;
pub mod model;
pub mod simulate;
