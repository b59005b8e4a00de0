use chrono::Utc;

const FACTS: &[&str] = &[
    "The fastest recorded raindrop fell at 18 mph (29 km/h).",
    "A cubic mile of fog is made up of less than a gallon of water.",
    "The highest temperature ever recorded on Earth was 134°F (56.7°C) in Death Valley, California.",
    "Snowflakes falling at 2-4 mph can take about 1 hour to reach the ground.",
    "Lightning can heat the air to around 54,000°F (30,000°C), which is six times hotter than the sun's surface.",
    "The windiest place on Earth is Commonwealth Bay, Antarctica, with winds regularly exceeding 150 mph.",
    "A single lightning bolt contains enough energy to toast 100,000 slices of bread.",
    "Temperatures in the upper atmosphere can drop to -130°F (-90°C).",
    "The longest recorded dry period was 173 months in Arica, Chile.",
    "The largest snowflake ever recorded was 15 inches wide and 8 inches thick.",
];

/// Fact picked by `seed`, wrapping around the list.
pub fn fact(seed: usize) -> &'static str {
    FACTS[seed % FACTS.len()]
}

/// A fact chosen from the clock's sub-second part.
pub fn random_fact() -> &'static str {
    fact(Utc::now().timestamp_subsec_nanos() as usize)
}
