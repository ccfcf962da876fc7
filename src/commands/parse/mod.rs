mod export;
mod pages;
mod pipeline;
mod run;

pub use run::run;
