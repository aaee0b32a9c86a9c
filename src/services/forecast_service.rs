use tracing::warn;

use crate::models::{Precipitation, Rect, SkyCover};

/// Night symbols are the day symbol + 100
const NIGHT_OFFSET: i64 = 100;

/// Day symbols that have a night variant; fog has none
const NIGHT_VARIANTS: [i64; 15] = [1, 2, 3, 60, 63, 68, 69, 70, 73, 80, 81, 83, 84, 85, 86];

/// Sky cover and precipitation for a DMI weather symbol
/// Unknown symbols are logged and drawn as clear sky
pub fn classify(code: i64) -> (SkyCover, Precipitation) {
    let sky = match day_symbol(code) {
        1 => SkyCover::Clear,
        2 | 80 | 81 | 83 | 84 | 85 | 86 => SkyCover::Broken,
        3 | 60 | 63 | 68 | 69 | 70 | 73 => SkyCover::Cloudy,
        45 => SkyCover::Fog,
        _ => {
            warn!("Unknown weather symbol: {}", code);
            return (SkyCover::Clear, Precipitation::None);
        }
    };

    let precipitation = match day_symbol(code) {
        60 | 80 => Precipitation::LightRain,
        63 | 81 => Precipitation::HeavyRain,
        68 | 83 => Precipitation::LightSleet,
        69 | 84 => Precipitation::HeavySleet,
        70 | 85 => Precipitation::LightSnow,
        73 | 86 => Precipitation::HeavySnow,
        _ => Precipitation::None,
    };

    (sky, precipitation)
}

/// Text for the current-conditions headline
pub fn describe(code: i64) -> String {
    if code == NIGHT_OFFSET + 1 {
        return "Clear".to_string();
    }
    let text = match day_symbol(code) {
        1 => "Sunny",
        2 => "Broken Clouds",
        3 => "Cloudy",
        45 => "Fog",
        60 | 80 => "Light Rain",
        63 | 81 => "Heavy Rain",
        68 | 83 => "Light Sleet",
        69 | 84 => "Heavy Sleet",
        70 | 85 => "Light Snow",
        73 | 86 => "Heavy Snow",
        _ => return format!("Undefined {}", code),
    };
    text.to_string()
}

fn day_symbol(code: i64) -> i64 {
    code.checked_sub(NIGHT_OFFSET)
        .filter(|day| NIGHT_VARIANTS.contains(day))
        .unwrap_or(code)
}

/// Rectangles of the hourly icon centred on column `x`
/// Sky cover sits in rows 205..215, precipitation hangs below it
pub fn icon_rects(sky: SkyCover, precipitation: Precipitation, x: i32) -> Vec<Rect> {
    let mut rects = match sky {
        SkyCover::Clear => Vec::new(),
        SkyCover::Broken => vec![
            Rect::new(x - 3, 205, x - 2, 215),
            Rect::new(x - 1, 205, x, 215),
            Rect::new(x + 1, 205, x + 2, 215),
            Rect::new(x + 3, 205, x + 4, 215),
        ],
        SkyCover::Cloudy => vec![Rect::new(x - 3, 205, x + 4, 215)],
        SkyCover::Fog => vec![
            Rect::new(x - 3, 205, x + 4, 207),
            Rect::new(x - 3, 209, x + 4, 211),
            Rect::new(x - 3, 213, x + 4, 215),
        ],
    };

    // one flake is a small plus sign
    let flake = |cx: i32, cy: i32| [Rect::new(cx - 2, cy, cx + 1, cy + 1), Rect::new(cx - 1, cy - 1, cx, cy + 2)];

    match precipitation {
        Precipitation::None => {}
        Precipitation::LightRain => rects.extend([
            Rect::new(x - 2, 215, x - 1, 218),
            Rect::new(x, 215, x + 1, 217),
            Rect::new(x + 2, 215, x + 3, 216),
        ]),
        Precipitation::HeavyRain => rects.extend([
            Rect::new(x - 2, 215, x - 1, 222),
            Rect::new(x, 215, x + 1, 220),
            Rect::new(x + 2, 215, x + 3, 218),
        ]),
        Precipitation::LightSleet | Precipitation::LightSnow => rects.extend(flake(x - 1, 217)),
        Precipitation::HeavySleet | Precipitation::HeavySnow => {
            rects.extend(flake(x - 1, 217));
            rects.extend(flake(x + 3, 218));
            rects.extend(flake(x + 1, 220));
        }
    }

    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_day_and_night_variants() {
        assert_eq!(classify(1), (SkyCover::Clear, Precipitation::None));
        assert_eq!(classify(101), (SkyCover::Clear, Precipitation::None));
        assert_eq!(classify(2), (SkyCover::Broken, Precipitation::None));
        assert_eq!(classify(103), (SkyCover::Cloudy, Precipitation::None));
        assert_eq!(classify(45), (SkyCover::Fog, Precipitation::None));
        assert_eq!(classify(60), (SkyCover::Cloudy, Precipitation::LightRain));
        assert_eq!(classify(180), (SkyCover::Broken, Precipitation::LightRain));
        assert_eq!(classify(163), (SkyCover::Cloudy, Precipitation::HeavyRain));
        assert_eq!(classify(84), (SkyCover::Broken, Precipitation::HeavySleet));
        assert_eq!(classify(170), (SkyCover::Cloudy, Precipitation::LightSnow));
        assert_eq!(classify(186), (SkyCover::Broken, Precipitation::HeavySnow));
    }

    #[test]
    fn test_unknown_codes_fall_back_to_clear() {
        for code in [0, 4, 82, 99, 100, 145, 182, 200, -1, i64::MIN] {
            assert_eq!(classify(code), (SkyCover::Clear, Precipitation::None), "code {}", code);
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(1), "Sunny");
        assert_eq!(describe(101), "Clear");
        assert_eq!(describe(102), "Broken Clouds");
        assert_eq!(describe(181), "Heavy Rain");
        assert_eq!(describe(7), "Undefined 7");
        assert_eq!(describe(145), "Undefined 145");
    }

    #[test]
    fn test_icon_rects() {
        assert!(icon_rects(SkyCover::Clear, Precipitation::None, 100).is_empty());
        assert_eq!(
            icon_rects(SkyCover::Cloudy, Precipitation::None, 100),
            vec![Rect::new(97, 205, 104, 215)]
        );

        let snow = icon_rects(SkyCover::Cloudy, Precipitation::HeavySnow, 100);
        assert_eq!(snow.len(), 1 + 6);
        assert_eq!(snow[1], Rect::new(97, 217, 100, 218));
        assert_eq!(snow[2], Rect::new(98, 216, 99, 219));

        // every icon stays inside its column
        for sky in [SkyCover::Clear, SkyCover::Broken, SkyCover::Cloudy, SkyCover::Fog] {
            for rect in icon_rects(sky, Precipitation::HeavyRain, 100) {
                assert!(rect.x0 >= 97 && rect.x1 <= 104);
                assert!(!rect.is_empty());
            }
        }
    }
}
