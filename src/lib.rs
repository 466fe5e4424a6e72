#![no_std]
#![doc = include_str!("../README.md")]

pub mod buttons;
pub mod config;
pub mod control;
pub mod countdown;
pub mod error;
pub mod filter;
pub mod hal;
pub mod leds;
pub mod note;
pub mod panel;
pub mod persistence;
pub mod pipeline;
pub mod pitch_table;
pub mod quantizer;
pub mod shared;
mod utils;

#[cfg(test)]
mod mock;
