mod common;
mod stages;
