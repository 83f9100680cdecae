pub mod connectivity;
pub mod debug;
pub mod dump;
pub mod dump_file;
pub mod init;
pub mod map;
pub mod quick_dump;
pub mod read;
pub mod registers;
pub mod reset;
pub mod status;
pub mod sync;
pub mod write;
