//! Short text interpretations of engine output, driven by the keyword reference data.
//!
//! Every lookup that can miss has an explicit generic wording, so an empty or partial data
//! directory still produces readable output.

use crate::aspects::{AspectMatch, ChartLayer};
use crate::chart::{ChartSnapshot, Placement};
use crate::reference::{house_key, ReferenceData};
use std::collections::BTreeMap;

mod forecast;

pub use forecast::{WeeklySummary, HIGHLIGHT_COUNT};

/// Element names in tie-break order.
const ELEMENTS: [&str; 4] = ["Fire", "Earth", "Air", "Water"];
const CHALLENGING: [&str; 2] = ["SQUARE", "OPPOSITION"];
const HARMONIOUS: [&str; 2] = ["TRINE", "SEXTILE"];

pub struct Interpreter<'a> {
    data: &'a ReferenceData,
}

impl<'a> Interpreter<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        Self { data }
    }

    pub fn planet_in_sign(&self, placement: &Placement) -> String {
        let body = placement.body;
        let sign = placement.sign;
        let planet_keywords = self.data.planets.lookup(&body.data_key());
        let sign_info = self.data.signs.lookup(&sign.data_key());

        match (planet_keywords.and_then(|k| k.first()), sign_info) {
            (Some(energy), Some(info)) if !info.is_empty() => {
                let element = info.first().map(String::as_str).unwrap_or("Unknown");
                let modality = info.get(1).map(String::as_str).unwrap_or("Unknown");
                let descriptor = info.get(3).map(String::as_str).unwrap_or("this sign");
                format!(
                    "{body} in {sign} ({element} {modality}): The {energy} energy expresses through {descriptor} characteristics."
                )
            }
            _ => format!("{body} in {sign}: Basic influence"),
        }
    }

    pub fn planet_in_house(&self, placement: &Placement) -> String {
        let body = placement.body;
        let house = placement.house;
        match self.data.houses.lookup(&house_key(house)) {
            Some([first, rest @ ..]) => {
                let second = rest.first().map(String::as_str).unwrap_or("related themes");
                format!(
                    "{body} in House {house}: Focuses {} energy on {first} and {second}.",
                    body.name().to_lowercase()
                )
            }
            _ => format!("{body} in House {house}: Influences this life area"),
        }
    }

    /// Natal or transit wording depending on the layers the match connects.
    pub fn aspect(&self, aspect: &AspectMatch) -> String {
        let head = format!(
            "{} {} {}: ",
            describe_end(aspect, true),
            aspect.aspect_type,
            describe_end(aspect, false)
        );
        let transit = !aspect.is_intra_chart();
        let kind = aspect.aspect_type.to_lowercase();

        let body = match aspect.keywords.as_slice() {
            [] if transit => format!("A {kind} transit affecting natal planet energies."),
            [] => format!("A {kind} relationship between these planets."),
            [first, rest @ ..] => {
                let emphasis = if rest.len() >= 2 {
                    format!("{} ", rest[..2].join("; "))
                } else {
                    String::new()
                };
                if transit {
                    format!(
                        "This transit brings {first} energy, emphasizing {emphasis}in the relationship between these planetary energies."
                    )
                } else {
                    format!(
                        "This {first} aspect brings {emphasis}between these planetary energies."
                    )
                }
            }
        };
        head + &body
    }

    /// A transiting body's position relative to the same body at birth.
    pub fn planet_transit(&self, transiting: &Placement, natal: &Placement) -> String {
        let body = transiting.body;
        let sign = transiting.sign;
        let head = format!("Transit {body} in {sign}: ");

        if transiting.sign == natal.sign {
            head + &format!(
                "Currently returning to natal sign, reinforcing core {} themes.",
                body.name().to_lowercase()
            )
        } else if transiting.house == natal.house {
            head + &format!(
                "Transiting natal {} house, activating birth themes in this life area.",
                natal.house
            )
        } else {
            let area = self
                .data
                .houses
                .lookup(&house_key(transiting.house))
                .and_then(|k| k.first())
                .map(String::as_str)
                .unwrap_or("life areas");
            head + &format!("Currently influencing {area} through {sign} energy.")
        }
    }

    /// Element balance, house emphasis and aspect tone of a chart.
    pub fn summary_themes(&self, chart: &ChartSnapshot) -> Vec<String> {
        let mut themes = Vec::new();

        let mut elements: BTreeMap<&str, usize> = ELEMENTS.iter().map(|e| (*e, 0)).collect();
        for placement in chart.placements.values() {
            let element = self
                .data
                .signs
                .lookup(&placement.sign.data_key())
                .and_then(|info| info.first());
            if let Some(count) = element.and_then(|e| elements.get_mut(e.as_str())) {
                *count += 1;
            }
        }
        let dominant = ELEMENTS
            .iter()
            .copied()
            .fold(ELEMENTS[0], |best, e| if elements[e] > elements[best] { e } else { best });
        themes.push(format!(
            "Dominant Element: {dominant} - emphasizes {} qualities",
            dominant.to_lowercase()
        ));

        if let Some(house) = emphasized_house(chart) {
            match self.data.houses.lookup(&house_key(house)).and_then(|k| k.first()) {
                Some(focus) => {
                    themes.push(format!("House {house} emphasis - focus on {focus} themes"))
                }
                None => log::debug!("No keywords for house {house}; skipping emphasis theme"),
            }
        }

        let challenging = count_kind(&chart.aspects, &CHALLENGING);
        if challenging > 0 {
            themes.push(format!(
                "Growth opportunities through {challenging} challenging aspects"
            ));
        }
        let harmonious = count_kind(&chart.aspects, &HARMONIOUS);
        if harmonious > 0 {
            themes.push(format!(
                "Natural talents indicated by {harmonious} harmonious aspects"
            ));
        }

        themes
    }
}

fn count_kind<'m>(aspects: impl IntoIterator<Item = &'m AspectMatch>, names: &[&str]) -> usize {
    aspects
        .into_iter()
        .filter(|a| names.iter().any(|n| a.aspect_type.eq_ignore_ascii_case(n)))
        .count()
}

/// The house holding the most bodies. On a tie, the house of the earliest body in
/// canonical order wins.
fn emphasized_house(chart: &ChartSnapshot) -> Option<u8> {
    let mut house_counts: BTreeMap<u8, usize> = BTreeMap::new();
    for placement in chart.placements.values() {
        *house_counts.entry(placement.house).or_insert(0) += 1;
    }
    let most = house_counts.values().copied().max()?;
    chart
        .placements
        .values()
        .map(|p| p.house)
        .find(|house| house_counts.get(house) == Some(&most))
}

fn describe_end(aspect: &AspectMatch, from: bool) -> String {
    let end = if from { aspect.from } else { aspect.to };
    if aspect.is_intra_chart() {
        end.body.to_string()
    } else {
        match end.layer {
            ChartLayer::Natal => format!("Natal {}", end.body),
            ChartLayer::Transit => format!("Transit {}", end.body),
        }
    }
}
