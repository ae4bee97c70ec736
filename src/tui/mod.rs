pub mod board;
pub mod colors;
pub mod home;
pub mod input;
pub mod run;
pub mod task_form;
pub mod template_form;
pub mod utils;
pub mod widgets;
