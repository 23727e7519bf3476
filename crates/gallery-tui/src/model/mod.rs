pub mod pager;
pub mod popover;
