//! Fixed 6-axis stat projection and the radar geometry for the detail chart.

use crate::state::Pokemon;

/// Axis labels, in the fixed order the chart is bound to.
pub const STAT_AXES: [&str; 6] = [
    "HP",
    "Attack",
    "Defense",
    "Special Attack",
    "Special Defense",
    "Speed",
];

/// Stat ceiling used to normalize radar radii.
pub const STAT_SCALE: f64 = 255.0;

/// Chart-ready view of one record's six stats.
#[derive(Clone, Debug, PartialEq)]
pub struct StatProjection {
    pub name: String,
    pub values: [u16; 6],
}

impl StatProjection {
    /// Labeled values in axis order.
    pub fn axes(&self) -> impl Iterator<Item = (&'static str, u16)> + '_ {
        STAT_AXES.iter().copied().zip(self.values.iter().copied())
    }
}

pub fn project(pokemon: &Pokemon) -> StatProjection {
    StatProjection {
        name: pokemon.name.clone(),
        values: [
            pokemon.hp,
            pokemon.attack,
            pokemon.defense,
            pokemon.sp_attack,
            pokemon.sp_defense,
            pokemon.speed,
        ],
    }
}

/// Vertices of the stat polygon: axis 0 points straight up, axes proceed
/// clockwise, each radius scaled by `value / STAT_SCALE`.
pub fn radar_points(values: &[u16; 6], radius: f64) -> [(f64, f64); 6] {
    let mut points = [(0.0, 0.0); 6];
    for (i, &value) in values.iter().enumerate() {
        let angle = std::f64::consts::FRAC_PI_2 - (i as f64) * std::f64::consts::TAU / 6.0;
        let r = radius * f64::from(value).min(STAT_SCALE) / STAT_SCALE;
        points[i] = (r * angle.cos(), r * angle.sin());
    }
    points
}

/// Unit direction of each axis spoke, for drawing the chart frame.
pub fn axis_points(radius: f64) -> [(f64, f64); 6] {
    radar_points(&[STAT_SCALE as u16; 6], radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pikachu() -> Pokemon {
        Pokemon {
            id: 1,
            pokedex_number: 25,
            name: "pikachu".into(),
            hp: 35,
            attack: 55,
            defense: 40,
            sp_attack: 50,
            sp_defense: 50,
            speed: 90,
        }
    }

    #[test]
    fn test_projection_preserves_axis_order() {
        let projection = project(&pikachu());
        assert_eq!(projection.values, [35, 55, 40, 50, 50, 90]);
        let labels: Vec<_> = projection.axes().map(|(label, _)| label).collect();
        assert_eq!(
            labels,
            [
                "HP",
                "Attack",
                "Defense",
                "Special Attack",
                "Special Defense",
                "Speed"
            ]
        );
    }

    #[test]
    fn test_radar_first_axis_points_up() {
        let points = radar_points(&[255, 0, 0, 0, 0, 0], 1.0);
        assert!((points[0].0).abs() < 1e-9);
        assert!((points[0].1 - 1.0).abs() < 1e-9);
        // remaining axes collapse to the origin at value zero
        for point in &points[1..] {
            assert!(point.0.abs() < 1e-9 && point.1.abs() < 1e-9);
        }
    }

    #[test]
    fn test_radar_values_clamp_to_scale() {
        let clamped = radar_points(&[u16::MAX; 6], 1.0);
        let full = axis_points(1.0);
        for (a, b) in clamped.iter().zip(full.iter()) {
            assert!((a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9);
        }
    }
}
