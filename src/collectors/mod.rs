pub mod perccli;
