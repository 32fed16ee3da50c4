mod decl_forms;
mod threading;
mod unsealing;
mod wrappers;
