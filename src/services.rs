pub mod drafts;
pub mod images;
pub mod purchases;
