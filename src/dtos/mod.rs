pub mod uploaddtos;
