//! Interactive terminal front end
pub mod task_list;
