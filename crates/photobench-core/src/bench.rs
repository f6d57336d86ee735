//! Linear propagation through an ordered bench.
//!
//! A [`Bench`] is an ordered list of [`Stage`]s. The first stage must be a
//! source selected with [`Selector::First`]; every later stage is an element
//! fed by the output of the stage before it, taken from the port its
//! selector names. Propagation is a single forward pass that stops at the
//! first failing stage.

use serde::{Deserialize, Serialize};

use crate::element::{OpticalElement, Port};
use crate::error::{BenchError, Result};
use crate::signal::OpticalSignal;
use crate::source::OpticalSource;

/// Which output of the previous stage feeds a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// The stage starts the chain and takes no input.
    First,
    Transmitted,
    Reflected,
}

impl Selector {
    /// The element port this selector reads, if any.
    pub fn port(self) -> Option<Port> {
        match self {
            Selector::First => None,
            Selector::Transmitted => Some(Port::Transmitted),
            Selector::Reflected => Some(Port::Reflected),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::First => write!(f, "first"),
            Selector::Transmitted => write!(f, "transmitted"),
            Selector::Reflected => write!(f, "reflected"),
        }
    }
}

/// Anything that can occupy a stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Source(OpticalSource),
    Element(OpticalElement),
}

impl Component {
    pub fn name(&self) -> &str {
        match self {
            Component::Source(s) => s.name(),
            Component::Element(e) => e.name(),
        }
    }

    /// Produce this component's output for `selector`, given the signal
    /// (if any) handed over by the previous stage.
    ///
    /// # Errors
    /// - [`BenchError::TypeMismatch`] if a source is handed a signal, or an
    ///   element is handed nothing.
    /// - [`BenchError::Configuration`] if the selector does not fit the
    ///   component (a source not selected as `first`, an element selected
    ///   as `first`).
    /// - Any error raised by the source or element itself.
    pub fn respond(&self, selector: Selector, input: Option<&OpticalSignal>) -> Result<OpticalSignal> {
        match (self, selector.port(), input) {
            (Component::Source(source), None, None) => source.emit(),
            (Component::Source(source), _, Some(_)) => Err(BenchError::TypeMismatch {
                component: source.name().to_string(),
                expected: "no input",
                found: "optical signal",
            }),
            (Component::Source(source), Some(_), None) => Err(BenchError::configuration(
                source.name(),
                format!("a source can only be selected as 'first', not '{selector}'"),
            )),
            (Component::Element(element), Some(port), Some(signal)) => element.output(port, signal),
            (Component::Element(element), _, None) => Err(BenchError::TypeMismatch {
                component: element.name().to_string(),
                expected: "optical signal",
                found: "nothing",
            }),
            (Component::Element(element), None, Some(_)) => Err(BenchError::configuration(
                element.name(),
                "an element must read the transmitted or reflected port",
            )),
        }
    }
}

impl From<OpticalSource> for Component {
    fn from(source: OpticalSource) -> Self {
        Component::Source(source)
    }
}

impl From<OpticalElement> for Component {
    fn from(element: OpticalElement) -> Self {
        Component::Element(element)
    }
}

/// One entry of the bench description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub component: Component,
    pub selector: Selector,
}

/// Output recorded for one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutput {
    pub name: String,
    pub selector: Selector,
    pub signal: OpticalSignal,
}

/// Result of walking a bench.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Propagation {
    outputs: Vec<StageOutput>,
}

impl Propagation {
    pub fn outputs(&self) -> &[StageOutput] {
        &self.outputs
    }

    pub fn final_signal(&self) -> Option<&OpticalSignal> {
        self.outputs.last().map(|o| &o.signal)
    }

    /// Final power as a fraction of the source power.
    pub fn overall_throughput(&self) -> Option<f64> {
        let first = self.outputs.first()?;
        let last = self.outputs.last()?;
        Some(last.signal.power_w() / first.signal.power_w())
    }
}

/// An ordered optical bench.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bench {
    stages: Vec<Stage>,
}

impl Bench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn with_stage(mut self, component: impl Into<Component>, selector: Selector) -> Self {
        self.push(component, selector);
        self
    }

    pub fn push(&mut self, component: impl Into<Component>, selector: Selector) {
        self.stages.push(Stage {
            component: component.into(),
            selector,
        });
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Walk the bench from the first stage to the last.
    ///
    /// # Errors
    /// [`BenchError::Configuration`] for an empty bench; otherwise the first
    /// error raised by any stage, unchanged.
    pub fn propagate(&self) -> Result<Propagation> {
        if self.stages.is_empty() {
            return Err(BenchError::configuration("bench", "no stages defined"));
        }

        let mut outputs: Vec<StageOutput> = Vec::with_capacity(self.stages.len());
        for (index, stage) in self.stages.iter().enumerate() {
            let input = outputs.last().map(|o| &o.signal);
            let signal = stage.component.respond(stage.selector, input)?;
            log::debug!(
                "stage {} '{}' ({}): {}",
                index,
                stage.component.name(),
                stage.selector,
                signal
            );
            outputs.push(StageOutput {
                name: stage.component.name().to_string(),
                selector: stage.selector,
                signal,
            });
        }

        Ok(Propagation { outputs })
    }
}
