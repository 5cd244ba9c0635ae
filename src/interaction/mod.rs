pub mod debounce;
pub mod drag;
pub mod shortcuts;
