//! # Scripts
//!
//! Headless replay of recorded input. A script is a TOML file of `[[event]]` tables, each with a
//! `type` and that event's fields, fed in order through [`ToolState`] against a fresh document:
//!
//! ```toml
//! [[event]]
//! type = "add_layer"
//!
//! [[event]]
//! type = "tool"
//! tool = "line"
//!
//! [[event]]
//! type = "pointer_down"
//! x = 10.0
//! y = 10.0
//! modifiers = ["shift"]
//! ```
//!
//! Positions are in viewport pixels, as they would arrive from a window.

use crate::input::{
    Key, KeyEvent, Modifiers, PointerButton, PointerEvent, TabletEvent, UnknownKey, WheelEvent,
};
use crate::pen_tools::{ToolKind, ToolState};
use annota_core::color::{Color, ColorParseError};
use annota_core::state::Document;
use ultraviolet::Vec2;

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error(transparent)]
    UnknownKey(#[from] UnknownKey),
    #[error("unknown tool {0:?}")]
    UnknownTool(String),
    #[error(transparent)]
    Color(#[from] ColorParseError),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(serde::Deserialize, Copy, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ModifierName {
    Shift,
    Ctrl,
    Alt,
}
fn modifiers(names: &[ModifierName]) -> Modifiers {
    names
        .iter()
        .map(|name| match name {
            ModifierName::Shift => Modifiers::SHIFT,
            ModifierName::Ctrl => Modifiers::CTRL,
            ModifierName::Alt => Modifiers::ALT,
        })
        .fold(Modifiers::empty(), |all, one| all | one)
}

#[derive(serde::Deserialize, Clone, PartialEq, Debug)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub button: PointerButton,
    #[serde(default)]
    pub modifiers: Vec<ModifierName>,
    pub pressure: Option<f32>,
}
impl Pointer {
    fn event(&self) -> PointerEvent {
        let event = PointerEvent::new(Vec2::new(self.x, self.y))
            .with_button(self.button)
            .with_modifiers(modifiers(&self.modifiers));
        match self.pressure {
            Some(pressure) => event.with_pressure(pressure),
            None => event,
        }
    }
}

#[derive(serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown(Pointer),
    PointerMove(Pointer),
    PointerUp(Pointer),
    Key {
        key: String,
        #[serde(default)]
        modifiers: Vec<ModifierName>,
        /// Release rather than press.
        #[serde(default)]
        up: bool,
    },
    Wheel {
        x: f32,
        y: f32,
        delta: f32,
    },
    Tablet {
        x: f32,
        y: f32,
        pressure: f32,
    },
    Tool {
        tool: String,
    },
    AddLayer {
        name: Option<String>,
    },
    Undo,
    Redo,
    Color {
        color: String,
    },
    Size {
        size: f32,
    },
    Fill {
        fill: bool,
    },
}

#[derive(serde::Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Script {
    #[serde(rename = "event", default)]
    pub events: Vec<ScriptEvent>,
}
impl std::str::FromStr for Script {
    type Err = ScriptError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
impl Script {
    pub fn from_path(path: &std::path::Path) -> Result<Self, ScriptError> {
        std::fs::read_to_string(path)?.parse()
    }
}

/// What a replay left behind.
#[derive(Clone, PartialEq, Debug)]
pub struct Summary {
    pub events: usize,
    /// Name and shape count of each layer, bottom to top.
    pub layers: Vec<(String, usize)>,
    pub undo_depth: usize,
    pub selected: usize,
    /// Redraw period the replay ended with.
    pub redraw_interval: std::time::Duration,
}
impl Summary {
    fn of(doc: &Document, tools: &ToolState, events: usize) -> Self {
        Self {
            events,
            layers: doc
                .layers()
                .layers()
                .iter()
                .map(|layer| (layer.name.clone(), layer.shapes.len()))
                .collect(),
            undo_depth: doc.undo_depth(),
            selected: doc.selection.len(),
            redraw_interval: tools.clock().interval(),
        }
    }
}
impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} events, {} layers, undo depth {}, {} selected, redraw every {} ms",
            self.events,
            self.layers.len(),
            self.undo_depth,
            self.selected,
            self.redraw_interval.as_millis()
        )?;
        for (name, shapes) in &self.layers {
            writeln!(f, "  {name}: {shapes} shapes")?;
        }
        Ok(())
    }
}

/// Replay `script` against a fresh document configured by `settings`.
pub fn run(script: &Script, settings: &crate::settings::Settings) -> Result<Summary, ScriptError> {
    let mut doc = settings.new_document();
    let mut tools = ToolState::new(settings);
    log::info!("replaying {} events", script.events.len());
    for event in &script.events {
        apply(&mut tools, &mut doc, event)?;
        // Every input redraws, as a window would.
        let gizmos = tools.redraw(&doc, std::time::Instant::now());
        log::trace!("redrew with {} gizmos", gizmos.len());
    }
    // Whatever the last tool was holding counts, as it would on close.
    tools.set_tool(&mut doc, ToolKind::Navigate);
    let summary = Summary::of(&doc, &tools, script.events.len());
    log::info!("replay finished: {} layers, undo depth {}", summary.layers.len(), summary.undo_depth);
    Ok(summary)
}

fn apply(tools: &mut ToolState, doc: &mut Document, event: &ScriptEvent) -> Result<(), ScriptError> {
    match event {
        ScriptEvent::PointerDown(pointer) => tools.pointer_down(doc, &pointer.event()),
        ScriptEvent::PointerMove(pointer) => tools.pointer_move(doc, &pointer.event()),
        ScriptEvent::PointerUp(pointer) => {
            tools.pointer_up(doc, &pointer.event());
        }
        ScriptEvent::Key {
            key,
            modifiers: names,
            up,
        } => {
            let event = KeyEvent {
                key: key.parse::<Key>()?,
                modifiers: modifiers(names),
            };
            if *up {
                tools.key_up(doc, &event);
            } else {
                tools.key_down(doc, &event);
            }
        }
        ScriptEvent::Wheel { x, y, delta } => tools.wheel(
            doc,
            &WheelEvent {
                pos: Vec2::new(*x, *y),
                delta: *delta,
                modifiers: Modifiers::empty(),
            },
        ),
        ScriptEvent::Tablet { x, y, pressure } => tools.tablet_move(
            doc,
            &TabletEvent {
                pos: Vec2::new(*x, *y),
                pressure: *pressure,
            },
        ),
        ScriptEvent::Tool { tool } => {
            let kind = tool
                .parse::<ToolKind>()
                .map_err(|_| ScriptError::UnknownTool(tool.clone()))?;
            tools.set_tool(doc, kind);
        }
        ScriptEvent::AddLayer { name } => {
            if let Err(err) = doc.add_layer(name.as_deref()) {
                log::debug!("layer not added: {err}");
            }
        }
        ScriptEvent::Undo => {
            if let Err(err) = doc.undo() {
                log::debug!("nothing undone: {err}");
            }
        }
        ScriptEvent::Redo => {
            if let Err(err) = doc.redo() {
                log::debug!("nothing redone: {err}");
            }
        }
        ScriptEvent::Color { color } => doc.draw.color = color.parse::<Color>()?,
        ScriptEvent::Size { size } => doc.draw.line_size = size.max(0.0),
        ScriptEvent::Fill { fill } => doc.draw.fill = *fill,
    }
    Ok(())
}
