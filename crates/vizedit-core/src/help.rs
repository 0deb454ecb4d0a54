//! Contextual help for form fields.
//!
//! A static table from `(group, field)` to a two-part text record. The
//! panel doesn't use it; the annotation renderer attaches each entry to
//! its form field as a `?` affordance.

use serde::Serialize;

/// How an entry is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpKind {
    /// Summary only, shown on hover
    Tooltip,
    /// Summary as title, description as body
    Popover,
}

/// One help annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    pub group: &'static str,
    pub field: &'static str,
    pub summary: &'static str,
    /// Empty for plain tooltips
    pub description: &'static str,
}

impl HelpEntry {
    const fn new(
        group: &'static str,
        field: &'static str,
        summary: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            group,
            field,
            summary,
            description,
        }
    }

    pub fn kind(&self) -> HelpKind {
        if self.description.is_empty() {
            HelpKind::Tooltip
        } else {
            HelpKind::Popover
        }
    }
}

/// Field group for ensembles.
pub const ENSEMBLE: &str = "ensemble";
/// Field group for nodes.
pub const NODE: &str = "node";
/// Field group for connections.
pub const CONNECTION: &str = "connection";

static ENTRIES: &[HelpEntry] = &[
    HelpEntry::new(ENSEMBLE, "n_neurons", "Type: int", "The number of neurons."),
    HelpEntry::new(
        ENSEMBLE,
        "dimensions",
        "Type: int",
        "The number of dimensions in the represented state space.",
    ),
    HelpEntry::new(
        ENSEMBLE,
        "radius",
        "Type: int\nDefault: 1.0",
        "The radius of the state space represented by the ensemble.",
    ),
    HelpEntry::new(
        ENSEMBLE,
        "encoders",
        "Type: Distribution or ndarray (`n_neurons`, `dimensions`)\n\
         Default: UniformHypersphere(surface=True)",
        "The encoders, used to transform from state space to neuron space. \
         Each row is a neuron's encoder, each column is a dimension of the \
         state space.",
    ),
    HelpEntry::new(
        ENSEMBLE,
        "intercepts",
        "Type: Distribution or ndarray (`n_neurons`)\nDefault: Uniform(-1.0, 1.0)",
        "The point along each neuron's encoder where its activity is zero. \
         If e is the neuron's encoder, then the activity will be zero when \
         dot(x, e) <= c, where c is the given intercept.",
    ),
    HelpEntry::new(
        ENSEMBLE,
        "max_rates",
        "Type: Distribution or ndarray (`n_neurons`)\nDefault: Uniform(200, 400)",
        "The activity of each neuron when dot(x, e) = 1, where e is the \
         neuron's encoder.",
    ),
    HelpEntry::new(
        ENSEMBLE,
        "eval_points",
        "Type: Distribution or ndarray (`n_eval_points`, `dims`)\n\
         Default: UniformHypersphere()",
        "The evaluation points used for decoder solving, spanning the \
         interval (-radius, radius) in each dimension, or a distribution \
         from which to choose evaluation points.",
    ),
    HelpEntry::new(
        ENSEMBLE,
        "n_eval_points",
        "Type: int\nDefault: None",
        "The number of evaluation points to be drawn from the `eval_points` \
         distribution. If None (the default), then a heuristic is used to \
         determine the number of evaluation points.",
    ),
    HelpEntry::new(
        ENSEMBLE,
        "neuron_type",
        "Type: Neurons\nDefault: LIF()",
        "The single cell model used to simulate all neurons in the ensemble.",
    ),
    HelpEntry::new(
        ENSEMBLE,
        "noise",
        "Type: StochasticProcess\nDefault: None",
        "Random noise injected directly into each neuron in the ensemble as \
         current. A sample is drawn for each individual neuron on every \
         simulation step.",
    ),
    HelpEntry::new(
        ENSEMBLE,
        "seed",
        "Type: int\nDefault: None",
        "The seed used for random number generation.",
    ),
    HelpEntry::new(
        NODE,
        "output",
        "Type: callable, array_like, or None",
        "The function that transforms the Node inputs into outputs, or a \
         constant output value. If ``None``, the input will be returned \
         unchanged.",
    ),
    HelpEntry::new(
        NODE,
        "size_in",
        "Type: int\nDefault: 0",
        "The number of dimensions in the input signal.",
    ),
    HelpEntry::new(
        NODE,
        "size_out",
        "Type: int",
        "The number of dimensions in the output signal. If not specified, it \
         will be determined based on the values of ``output`` and ``size_in``.",
    ),
    HelpEntry::new(CONNECTION, "expand", "Click to show / hide full path", ""),
    HelpEntry::new(
        CONNECTION,
        "fan_passthrough",
        "This connection is to / from a passthrough node: Fan in / out \
         information is approximate.",
        "",
    ),
];

/// Looks up the annotation for a field.
pub fn lookup(group: &str, field: &str) -> Option<&'static HelpEntry> {
    ENTRIES
        .iter()
        .find(|e| e.group == group && e.field == field)
}

/// Every annotation in a group, in table order.
pub fn group(group: &str) -> impl Iterator<Item = &'static HelpEntry> + '_ {
    ENTRIES.iter().filter(move |e| e.group == group)
}

/// The whole table.
pub fn entries() -> &'static [HelpEntry] {
    ENTRIES
}

/// Serializes the table for the annotation renderer.
pub fn to_json() -> serde_json::Result<String> {
    serde_json::to_string(ENTRIES)
}
