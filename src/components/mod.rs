pub mod background;
pub mod help;
pub mod multiline;
pub mod score_bar;
