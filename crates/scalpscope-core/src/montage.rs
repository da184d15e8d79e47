//! Standard EEG electrode montages
//!
//! Maps channel names to physical scalp positions for the built-in standard
//! layouts. Positions are generated from the 10-20 geometry itself: midline
//! and circumference anchors sit at their 10%/20% arc fractions on the unit
//! sphere, and intermediate 10-10 electrodes are great-circle subdivisions
//! of the coronal arcs between them.
//!
//! Coordinates are unit vectors with +x right, +y anterior, +z superior
//! (vertex at `[0, 0, 1]`). For 2-D topomap placement, positions project
//! onto the unit disk with an azimuthal equidistant projection: the vertex
//! lands at the origin and the head circumference on the unit circle.

use std::f64::consts::FRAC_PI_2;

use crate::error::MontageError;

/// Unit-sphere electrode position.
pub type Position = [f64; 3];

/// A named electrode layout mapping channel names to scalp positions.
#[derive(Debug, Clone)]
pub struct Montage {
    name: String,
    electrodes: Vec<(String, Position)>,
}

impl Montage {
    /// The classic 21-electrode 10-20 layout
    pub const STANDARD_1020: &'static str = "standard_1020";
    /// The extended 61-electrode 10-10 layout
    pub const STANDARD_1010: &'static str = "standard_1010";

    /// Construct one of the built-in standard montages by name.
    ///
    /// # Errors
    ///
    /// [`MontageError::UnknownMontage`] when `name` is not listed by
    /// [`Montage::builtin_names`].
    pub fn standard(name: &str) -> Result<Self, MontageError> {
        match name {
            Self::STANDARD_1020 => Ok(Self {
                name: name.to_string(),
                electrodes: ten_ten_table()
                    .into_iter()
                    .filter(|(label, _)| TEN_TWENTY_NAMES.contains(&label.as_str()))
                    .collect(),
            }),
            Self::STANDARD_1010 => Ok(Self {
                name: name.to_string(),
                electrodes: ten_ten_table(),
            }),
            other => Err(MontageError::UnknownMontage(other.to_string())),
        }
    }

    /// Names accepted by [`Montage::standard`]
    #[must_use]
    pub const fn builtin_names() -> [&'static str; 2] {
        [Self::STANDARD_1020, Self::STANDARD_1010]
    }

    /// Montage name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of electrodes in the layout
    #[must_use]
    pub fn len(&self) -> usize {
        self.electrodes.len()
    }

    /// True when the layout has no electrodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.electrodes.is_empty()
    }

    /// Electrode names in layout order
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.electrodes.iter().map(|(label, _)| label.as_str())
    }

    /// Unit-sphere position of a channel.
    ///
    /// Lookup is case-insensitive and resolves the legacy T3/T4/T5/T6
    /// aliases to their modern T7/T8/P7/P8 positions.
    #[must_use]
    pub fn position(&self, channel: &str) -> Option<Position> {
        let wanted = canonical(channel);
        self.electrodes
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(&wanted))
            .map(|&(_, pos)| pos)
    }

    /// Channel position projected onto the unit disk (azimuthal
    /// equidistant, nose toward +y).
    #[must_use]
    pub fn project(&self, channel: &str) -> Option<[f64; 2]> {
        self.position(channel).map(project_to_disk)
    }
}

/// Azimuthal equidistant projection of a scalp position onto the unit disk.
///
/// The vertex maps to the origin; positions on the head circumference
/// (`z = 0`) map onto the unit circle.
#[must_use]
pub fn project_to_disk(pos: Position) -> [f64; 2] {
    let [x, y, z] = pos;
    let inclination = z.clamp(-1.0, 1.0).acos();
    let r = inclination / FRAC_PI_2;
    let azimuth = x.atan2(y);
    [r * azimuth.sin(), r * azimuth.cos()]
}

// ============================================================================
// Layout Generation
// ============================================================================

/// The classic 10-20 subset of the full table.
const TEN_TWENTY_NAMES: [&str; 21] = [
    "Fp1", "Fpz", "Fp2", "F7", "F3", "Fz", "F4", "F8", "T7", "C3", "Cz",
    "C4", "T8", "P7", "P3", "Pz", "P4", "P8", "O1", "Oz", "O2",
];

/// Position from inclination off the vertex and azimuth off the anterior
/// midline (positive toward the right ear), both in degrees.
fn sph(alpha_deg: f64, beta_deg: f64) -> Position {
    let a = alpha_deg.to_radians();
    let b = beta_deg.to_radians();
    [a.sin() * b.sin(), a.sin() * b.cos(), a.cos()]
}

/// Great-circle interpolation between two unit vectors.
fn slerp(u: Position, v: Position, t: f64) -> Position {
    let dot = (u[0] * v[0] + u[1] * v[1] + u[2] * v[2]).clamp(-1.0, 1.0);
    let omega = dot.acos();
    if omega < 1e-9 {
        return u;
    }
    let (wu, wv) = (
        ((1.0 - t) * omega).sin() / omega.sin(),
        (t * omega).sin() / omega.sin(),
    );
    [
        wu * u[0] + wv * v[0],
        wu * u[1] + wv * v[1],
        wu * u[2] + wv * v[2],
    ]
}

/// Generate the full 10-10 electrode table.
fn ten_ten_table() -> Vec<(String, Position)> {
    let mut table: Vec<(String, Position)> = Vec::with_capacity(61);
    let mut push = |label: &str, pos: Position| table.push((label.to_string(), pos));

    // Midline arc between Fpz and Oz over the vertex, at the 10-20
    // fractions of the nasion-inion line.
    push("AFz", sph(67.5, 0.0));
    push("Fz", sph(45.0, 0.0));
    push("FCz", sph(22.5, 0.0));
    push("Cz", sph(0.0, 0.0));
    push("CPz", sph(22.5, 180.0));
    push("Pz", sph(45.0, 180.0));
    push("POz", sph(67.5, 180.0));

    // Circumference ring through Fpz, T7/T8, and Oz in 5% steps of the
    // head circumference (18 degrees), left negative.
    push("Fpz", sph(90.0, 0.0));
    push("Oz", sph(90.0, 180.0));
    const RING: [(&str, &str, f64); 9] = [
        ("Fp1", "Fp2", 18.0),
        ("AF7", "AF8", 36.0),
        ("F7", "F8", 54.0),
        ("FT7", "FT8", 72.0),
        ("T7", "T8", 90.0),
        ("TP7", "TP8", 108.0),
        ("P7", "P8", 126.0),
        ("PO7", "PO8", 144.0),
        ("O1", "O2", 162.0),
    ];
    for (left, right, beta) in RING {
        push(left, sph(90.0, -beta));
        push(right, sph(90.0, beta));
    }

    // Coronal arcs: quarter subdivisions between ring and midline.
    let rows: [(&str, &str, &str, [&str; 3], [&str; 3]); 5] = [
        ("F7", "Fz", "F8", ["F5", "F3", "F1"], ["F6", "F4", "F2"]),
        ("FT7", "FCz", "FT8", ["FC5", "FC3", "FC1"], ["FC6", "FC4", "FC2"]),
        ("T7", "Cz", "T8", ["C5", "C3", "C1"], ["C6", "C4", "C2"]),
        ("TP7", "CPz", "TP8", ["CP5", "CP3", "CP1"], ["CP6", "CP4", "CP2"]),
        ("P7", "Pz", "P8", ["P5", "P3", "P1"], ["P6", "P4", "P2"]),
    ];
    let lookup = |table: &[(String, Position)], label: &str| {
        table
            .iter()
            .find(|(name, _)| name == label)
            .map(|&(_, pos)| pos)
            .unwrap_or([0.0, 0.0, 1.0])
    };
    for (ring_left, mid, ring_right, left_names, right_names) in rows {
        let (rl, m, rr) = (
            lookup(&table, ring_left),
            lookup(&table, mid),
            lookup(&table, ring_right),
        );
        for (i, label) in left_names.into_iter().enumerate() {
            table.push((label.to_string(), slerp(rl, m, 0.25 * (i + 1) as f64)));
        }
        for (i, label) in right_names.into_iter().enumerate() {
            table.push((label.to_string(), slerp(rr, m, 0.25 * (i + 1) as f64)));
        }
    }

    // AF and PO rows only have the halfway electrodes.
    let halves: [(&str, &str, &str, &str, &str); 2] = [
        ("AF7", "AFz", "AF8", "AF3", "AF4"),
        ("PO7", "POz", "PO8", "PO3", "PO4"),
    ];
    for (ring_left, mid, ring_right, left_name, right_name) in halves {
        let (rl, m, rr) = (
            lookup(&table, ring_left),
            lookup(&table, mid),
            lookup(&table, ring_right),
        );
        table.push((left_name.to_string(), slerp(rl, m, 0.5)));
        table.push((right_name.to_string(), slerp(rr, m, 0.5)));
    }

    table
}

/// Resolve legacy 10-20 aliases to the modern names.
fn canonical(channel: &str) -> String {
    match channel.to_ascii_uppercase().as_str() {
        "T3" => "T7".to_string(),
        "T4" => "T8".to_string(),
        "T5" => "P7".to_string(),
        "T6" => "P8".to_string(),
        _ => channel.to_string(),
    }
}
