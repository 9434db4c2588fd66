//! Step list shown from the instruction banner.

use serde::{Deserialize, Serialize};
use wayfinder_core::{format_distance, preview_distance, Step};

/// One row of the step list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRow {
    /// Instruction text
    pub instruction: String,
    /// Distance rounded to one decimal with a `" meter"` suffix
    pub distance_text: String,
}

/// The steps of a route without the departure step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Rows in travel order
    pub rows: Vec<ItineraryRow>,
}

impl Itinerary {
    /// Build the list from route steps. The first step is dropped.
    pub fn from_steps(steps: &[Step]) -> Self {
        let rows = steps
            .iter()
            .skip(1)
            .map(|step| ItineraryRow {
                instruction: step.instruction.clone(),
                distance_text: format!(
                    "{} meter",
                    format_distance(preview_distance(step.distance_meters))
                ),
            })
            .collect();
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl std::fmt::Display for Itinerary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Steps")?;
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(f, "  {:>2}. {} ({})", i + 1, row.instruction, row.distance_text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::Coordinate;

    #[test]
    fn test_departure_dropped_and_distance_rounded() {
        let origin = Coordinate::new(0.0, 0.0);
        let steps = vec![
            Step::new("Depart", 0.0, origin),
            Step::new("Turn right", 120.34, origin),
            Step::new("Arrive", 15.0, origin),
        ];
        let itinerary = Itinerary::from_steps(&steps);
        assert_eq!(itinerary.len(), 2);
        assert_eq!(itinerary.rows[0].instruction, "Turn right");
        assert_eq!(itinerary.rows[0].distance_text, "120.3 meter");
        assert_eq!(itinerary.rows[1].distance_text, "15.0 meter");
    }

    #[test]
    fn test_empty_steps() {
        assert!(Itinerary::from_steps(&[]).is_empty());
    }

    #[test]
    fn test_display() {
        let origin = Coordinate::new(0.0, 0.0);
        let steps = vec![Step::new("Depart", 0.0, origin), Step::new("Arrive", 15.0, origin)];
        let text = Itinerary::from_steps(&steps).to_string();
        assert_eq!(text, "Steps\n   1. Arrive (15.0 meter)\n");
    }
}
