// SPDX-License-Identifier: GPL-3.0-only

//! Paged Pokédex browsing over PokéApi.
//!
//! A [`StarryCore`](crate::core::StarryCore) owns the pagination controller and two pipelines:
//! the listing pipeline turns each page request into rows (placeholders
//! first), the detail pipeline resolves those rows one by one, in order, into
//! a name to detail map. Both only ever publish results of their latest run.
//! [`AppModel`](crate::app::AppModel) mirrors that state for display.

pub mod app;
pub mod carousel;
pub mod config;
pub mod core;
pub mod entities;
pub mod utils;
