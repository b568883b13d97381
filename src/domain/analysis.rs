use serde::{Deserialize, Serialize};

use crate::entities::image::normalize_keywords;

/// Upper bound on tags stored per image.
pub const MAX_TAGS: usize = 60;

/// Raw signals produced by the client-side analysis of one image.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSignals<'a> {
    pub extracted_text: &'a str,
    pub detected_objects: &'a [String],
    pub dominant_colors: &'a [String],
    pub ai_tags: &'a [String],
}

/// A named group of keywords plus the tags added when one of them is seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
}

/// Keyword lists driving tag derivation. Loaded from configuration,
/// defaults mirror the lists the analysis pipeline has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagRules {
    pub priority_objects: Vec<String>,
    pub brand_groups: Vec<KeywordGroup>,
    pub shopping_markers: Vec<String>,
    pub emotion_keywords: Vec<String>,
    pub activity_keywords: Vec<String>,
    pub vehicle_objects: Vec<String>,
    pub tech_objects: Vec<String>,
    pub food_objects: Vec<String>,
    pub outdoor_indicators: Vec<String>,
    pub indoor_indicators: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for TagRules {
    fn default() -> Self {
        TagRules {
            priority_objects: words(&["car", "truck", "bus", "motorcycle", "laptop", "phone", "keyboard"]),
            brand_groups: vec![
                KeywordGroup {
                    keywords: words(&["apple", "samsung", "google", "microsoft"]),
                    tags: words(&["tech-brand"]),
                },
                KeywordGroup {
                    keywords: words(&["toyota", "honda", "ford", "bmw"]),
                    tags: words(&["car-brand", "automotive"]),
                },
            ],
            shopping_markers: words(&["price", "$", "buy"]),
            emotion_keywords: words(&["happy", "sad", "excited", "calm", "energetic", "peaceful"]),
            activity_keywords: words(&["running", "walking", "sitting", "standing", "driving", "cooking"]),
            vehicle_objects: words(&["car", "truck", "bus", "motorcycle", "bicycle", "vehicle"]),
            tech_objects: words(&["laptop", "phone", "keyboard", "mouse", "computer", "tv"]),
            food_objects: words(&["pizza", "sandwich", "food", "cup", "bottle", "bowl"]),
            outdoor_indicators: words(&["car", "truck", "bus", "traffic light", "stop sign", "bench"]),
            indoor_indicators: words(&["chair", "couch", "bed", "tv", "laptop", "keyboard"]),
        }
    }
}

fn mentions(value: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| value.contains(k.as_str()))
}

/// Builds the stored tag list for an image: raw objects, colors and AI tags
/// followed by derived smart and contextual tags. Normalized, de-duplicated
/// in first-seen order and capped at [`MAX_TAGS`].
pub fn derive_tags(signals: &AnalysisSignals<'_>, rules: &TagRules) -> Vec<String> {
    let objects = normalize_keywords(signals.detected_objects);
    let colors = normalize_keywords(signals.dominant_colors);
    let ai_tags = normalize_keywords(signals.ai_tags);
    let text = signals.extracted_text.to_lowercase();

    let mut all: Vec<String> = Vec::new();
    all.extend(objects.iter().cloned());
    all.extend(colors.iter().cloned());
    all.extend(ai_tags.iter().cloned());
    all.extend(smart_tags(&objects, &colors, &text, &ai_tags, rules));
    all.extend(contextual_tags(&objects, &text, rules));

    let mut tags = normalize_keywords(&all);
    tags.truncate(MAX_TAGS);
    tags
}

fn smart_tags(objects: &[String], colors: &[String], text: &str, ai_tags: &[String], rules: &TagRules) -> Vec<String> {
    let mut tags = Vec::new();

    for color in colors {
        for object in objects {
            if mentions(object, &rules.priority_objects) {
                tags.push(format!("{color} {object}"));
            }
            if object.contains("car") || object.contains("vehicle") {
                tags.push(format!("{color} car"));
                tags.push(format!("{color} vehicle"));
            }
            if object.contains("laptop") || object.contains("computer") {
                tags.push(format!("{color} laptop"));
                tags.push(format!("{color} computer"));
            }
            if object.contains("phone") || object.contains("cell") {
                tags.push(format!("{color} phone"));
                tags.push(format!("{color} smartphone"));
            }
        }
    }

    for ai_tag in ai_tags {
        if ai_tag.contains("car") || ai_tag.contains("vehicle") {
            tags.extend(colors.iter().map(|color| format!("{color} {ai_tag}")));
        }
    }

    for group in &rules.brand_groups {
        for brand in group.keywords.iter().filter(|b| text.contains(b.as_str())) {
            tags.push(brand.clone());
            tags.push("brand".to_string());
            tags.extend(group.tags.iter().cloned());
        }
    }

    if mentions(text, &rules.shopping_markers) {
        tags.extend(words(&["shopping", "commerce", "product"]));
    }

    for ai_tag in ai_tags {
        if mentions(ai_tag, &rules.emotion_keywords) {
            tags.extend(words(&["emotional-content", "mood"]));
        }
        if mentions(ai_tag, &rules.activity_keywords) {
            tags.extend(words(&["activity", "action"]));
        }
    }

    tags
}

fn contextual_tags(objects: &[String], text: &str, rules: &TagRules) -> Vec<String> {
    let mut tags = Vec::new();
    let count = |keywords: &[String]| objects.iter().filter(|o| mentions(o, keywords)).count();

    let vehicles = count(&rules.vehicle_objects);
    if vehicles > 0 {
        tags.extend(words(&["transportation-scene", "outdoor"]));
        if vehicles > 1 {
            tags.extend(words(&["traffic", "multiple-vehicles"]));
        }
    }

    let tech = count(&rules.tech_objects);
    if tech > 0 {
        tags.extend(words(&["technology-scene", "digital"]));
        if tech > 2 {
            tags.extend(words(&["tech-setup", "workspace"]));
        }
    }

    let food = count(&rules.food_objects);
    if food > 0 {
        tags.extend(words(&["food-scene", "dining"]));
        if food > 2 {
            tags.extend(words(&["meal", "restaurant"]));
        }
    }

    if count(&rules.outdoor_indicators) > 0 {
        tags.extend(words(&["outdoor", "street-scene"]));
    }
    if count(&rules.indoor_indicators) > 0 {
        tags.extend(words(&["indoor", "interior"]));
    }

    if objects.iter().any(|o| o == "sports ball" || o == "tennis racket") {
        tags.extend(words(&["sports", "recreation", "activity"]));
    }
    if objects.iter().any(|o| o == "book") || text.contains("read") {
        tags.extend(words(&["reading", "education", "learning"]));
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(v: &[&str]) -> Vec<String> {
        words(v)
    }

    #[test]
    fn colored_vehicle_gets_combination_and_scene_tags() {
        let objects = owned(&["Car"]);
        let colors = owned(&["red"]);
        let signals = AnalysisSignals {
            detected_objects: &objects,
            dominant_colors: &colors,
            ..Default::default()
        };

        let tags = derive_tags(&signals, &TagRules::default());

        assert_eq!(&tags[..3], ["car", "red", "red car"]);
        assert!(tags.contains(&"red vehicle".to_string()));
        assert!(tags.contains(&"transportation-scene".to_string()));
        assert!(tags.contains(&"street-scene".to_string()));
        assert_eq!(tags.iter().filter(|t| *t == "outdoor").count(), 1);
    }

    #[test]
    fn brands_and_shopping_come_from_text() {
        let signals = AnalysisSignals {
            extracted_text: "Buy the new Toyota for a great PRICE",
            ..Default::default()
        };

        let tags = derive_tags(&signals, &TagRules::default());

        for expected in ["toyota", "brand", "car-brand", "automotive", "shopping", "commerce"] {
            assert!(tags.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn tag_list_is_capped() {
        let ai_tags: Vec<String> = (0..100).map(|i| format!("tag-{i}")).collect();
        let signals = AnalysisSignals {
            ai_tags: &ai_tags,
            ..Default::default()
        };

        let tags = derive_tags(&signals, &TagRules::default());

        assert_eq!(tags.len(), MAX_TAGS);
        assert_eq!(tags[0], "tag-0");
    }
}
