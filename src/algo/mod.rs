pub mod clustering;
pub mod degree;
pub mod init;
pub mod matrix;
pub mod metric;
pub mod normalize;
pub mod optimize;
pub mod points;
pub mod similarity;
