pub mod hosts;

pub use hosts::*;
