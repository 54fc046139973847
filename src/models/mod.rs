pub mod polaroidmodel;
