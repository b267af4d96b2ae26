pub mod colors;
pub mod common;
pub mod document;
pub mod elements;
pub mod image;
pub mod lesson;
pub mod page;
pub mod presentation;
pub mod shape;
pub mod text;
