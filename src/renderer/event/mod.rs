mod code;
mod core;
mod formatting;
mod links;
mod misc;
mod tables;
mod text;

pub(crate) use core::EventRenderer;

pub(super) use crate::markdown::extract_code_language;
pub(super) use crate::table::TableRenderer;
pub(super) use crate::theme::{Theme, ThemeElement, create_style};
pub(super) use anyhow::Result;
pub(super) use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
pub(super) use text::Span;

/// Narrowest column budget used for wrapped content inside deep nesting.
pub(super) const MIN_WRAP_WIDTH: usize = 20;
