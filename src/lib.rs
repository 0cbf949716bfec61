//! Interrupt-driven button/LED firmware for the STM32F103 "Blue Pill".
//!
//! Two push buttons raise EXTI interrupts. Each handler only acknowledges its
//! line and sets an [`EventFlag`](event::EventFlag); the main loop
//! ([`Dispatcher`](dispatch::Dispatcher)) picks the flag up, clears it and
//! toggles the matching LED.
//!
//! Everything except `hardware::stm32` is target independent, so the whole
//! control path runs on a host against `sim::SimBoard`. The `sim` module is
//! left out of bare-metal builds.

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod board;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod handlers;
pub mod hardware;
pub mod irq;
pub mod pin;
#[cfg(not(target_os = "none"))]
pub mod sim;

pub use error::Error;
