// src/display/mod.rs
//! Display collaborators

pub mod terminal;

use crate::{decision::RenderCommand, error::Result};

/// Anything that can draw a render command
pub trait SpeedDisplay {
    fn render(&mut self, command: &RenderCommand) -> Result<()>;
}

/// Skips redraws when the command has not changed since the last frame
pub struct DedupDisplay<D> {
    inner: D,
    last: Option<RenderCommand>,
}

impl<D: SpeedDisplay> DedupDisplay<D> {
    pub fn new(inner: D) -> Self {
        Self { inner, last: None }
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: SpeedDisplay> SpeedDisplay for DedupDisplay<D> {
    fn render(&mut self, command: &RenderCommand) -> Result<()> {
        if self.last.as_ref() == Some(command) {
            return Ok(());
        }
        self.inner.render(command)?;
        self.last = Some(command.clone());
        Ok(())
    }
}
