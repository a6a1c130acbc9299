use rand::Rng;
use serde::{Deserialize, Serialize};

// Constants for the spin animation
pub const SPIN_DURATION_MS: u64 = 3000; // Wheel animation length before the prize is revealed
pub const FULL_TURNS: i32 = 5; // Decorative full rotations added to every spin
pub const POINTER_OFFSET_DEG: i32 = 12; // Nudges the wheel image under the pointer
pub const WHEEL_SEGMENTS: usize = 8;

/// The prize label for segments that don't win anything.
pub const NO_PRIZE_LABEL: &str = "Better Luck Next Time";

/// A half-open angular range `[min_degree, max_degree)` of the wheel.
/// A segment whose `min_degree > max_degree` wraps through 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrizeSegment {
    pub min_degree: u16,
    pub max_degree: u16,
    pub label: &'static str,
}

impl PrizeSegment {
    pub fn contains(&self, normalized: u16) -> bool {
        if self.min_degree < self.max_degree {
            normalized >= self.min_degree && normalized < self.max_degree
        } else {
            normalized >= self.min_degree || normalized < self.max_degree
        }
    }
}

/// Table order matters: the first matching segment wins, and the first entry
/// doubles as the fallback.
pub const PRIZE_SEGMENTS: [PrizeSegment; WHEEL_SEGMENTS] = [
    PrizeSegment { min_degree: 90, max_degree: 135, label: "Free Tablet on programs over 1,00,000 Rs for working professionals" },
    PrizeSegment { min_degree: 45, max_degree: 90, label: "Free Onspot* offer to your dream university" },
    PrizeSegment { min_degree: 0, max_degree: 45, label: NO_PRIZE_LABEL },
    PrizeSegment { min_degree: 315, max_degree: 360, label: "Exclusive Upgrad Merchandise" },
    PrizeSegment { min_degree: 270, max_degree: 315, label: "Free Certification course in Data Science" },
    PrizeSegment { min_degree: 135, max_degree: 180, label: "Free certification course in digital marketing" },
    PrizeSegment { min_degree: 225, max_degree: 270, label: "Free laptops on all accelerated pathway program" },
    PrizeSegment { min_degree: 180, max_degree: 225, label: NO_PRIZE_LABEL },
];

/// Maps a drawn angle into the prize table's frame. The table's zero sits
/// 270 degrees away from the drawn angle.
pub fn normalize_angle(angle: u16) -> u16 {
    let angle = (angle % 360) as i32;
    (270 - angle).rem_euclid(360) as u16
}

pub fn find_segment(angle: u16) -> &'static PrizeSegment {
    let normalized = normalize_angle(angle);
    match PRIZE_SEGMENTS.iter().find(|seg| seg.contains(normalized)) {
        Some(segment) => segment,
        None => {
            log::warn!("No prize segment covers {} degrees, using the first segment", normalized);
            &PRIZE_SEGMENTS[0]
        }
    }
}

pub fn resolve_prize(angle: u16) -> &'static str {
    find_segment(angle).label
}

pub fn is_no_prize(label: &str) -> bool {
    label.contains(NO_PRIZE_LABEL)
}

/// Draws a uniformly random integer angle in `[0, 360)`.
pub fn draw_angle<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    rng.gen_range(0..360)
}

/// Rotation applied to the wheel image, in degrees. Negative values turn the
/// wheel counter-clockwise. Has no bearing on the prize.
pub fn total_rotation(angle: u16) -> i32 {
    -(FULL_TURNS * 360 + angle as i32) - POINTER_OFFSET_DEG
}

/// The result of one spin
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SpinOutcome {
    pub angle: u16,
    pub prize: String,
}

impl SpinOutcome {
    pub fn from_angle(angle: u16) -> Self {
        Self {
            angle: angle % 360,
            prize: resolve_prize(angle).to_string(),
        }
    }

    pub fn is_win(&self) -> bool {
        !is_no_prize(&self.prize)
    }

    pub fn headline(&self, name: Option<&str>) -> String {
        let title = if self.is_win() { "Congratulations!" } else { "Almost there!" };
        let line = if self.is_win() { "You've won:" } else { "Better luck next time!" };
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => format!("{} {}, {}", title, name, line),
            None => format!("{} {}", title, line),
        }
    }

    pub fn claim_hint(&self, email: Option<&str>) -> Option<String> {
        if !self.is_win() {
            return None;
        }
        let email = email.map(str::trim).filter(|e| !e.is_empty()).unwrap_or("your email");
        Some(format!(
            "We'll contact you at {} with details on how to claim your prize.",
            email
        ))
    }
}

/// Represents the current state of the wheel
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Wheel {
    pub is_spinning: bool,
    pub rotation: i32,
}

impl Wheel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false without touching the wheel if a spin is already running.
    pub fn start_spin(&mut self, angle: u16) -> bool {
        if self.is_spinning {
            return false;
        }
        self.is_spinning = true;
        self.rotation = total_rotation(angle);
        true
    }

    pub fn complete_spin(&mut self) {
        self.is_spinning = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const LAPTOPS: &str = "Free laptops on all accelerated pathway program";
    const ONSPOT: &str = "Free Onspot* offer to your dream university";

    #[test]
    fn test_every_angle_resolves_to_one_segment() {
        for angle in 0..360u16 {
            let normalized = normalize_angle(angle);
            let matches = PRIZE_SEGMENTS.iter().filter(|s| s.contains(normalized)).count();
            assert_eq!(matches, 1, "angle {} matched {} segments", angle, matches);
            assert_eq!(resolve_prize(angle), resolve_prize(angle));
        }
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0), 270);
        assert_eq!(normalize_angle(30), 240);
        assert_eq!(normalize_angle(270), 0);
        assert_eq!(normalize_angle(271), 359);
        assert_eq!(normalize_angle(359), 271);
        assert_eq!(normalize_angle(390), 240);
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(resolve_prize(30), LAPTOPS);
        assert_eq!(resolve_prize(10), LAPTOPS);
        assert_eq!(resolve_prize(200), ONSPOT);
    }

    #[test]
    fn test_extremes() {
        // 0 -> 270 and 359 -> 271, both in the Data Science segment
        assert_eq!(resolve_prize(0), "Free Certification course in Data Science");
        assert_eq!(resolve_prize(359), "Free Certification course in Data Science");
    }

    #[test]
    fn test_segment_boundaries() {
        // normalized 226, 225 | 224
        assert_eq!(resolve_prize(44), "Free laptops on all accelerated pathway program");
        assert_eq!(resolve_prize(45), "Free laptops on all accelerated pathway program");
        assert_eq!(resolve_prize(46), NO_PRIZE_LABEL);
        // normalized 181, 180 | 179
        assert_eq!(resolve_prize(89), NO_PRIZE_LABEL);
        assert_eq!(resolve_prize(90), NO_PRIZE_LABEL);
        assert_eq!(resolve_prize(91), "Free certification course in digital marketing");
        // normalized 136, 135 | 134
        assert_eq!(resolve_prize(134), "Free certification course in digital marketing");
        assert_eq!(resolve_prize(135), "Free certification course in digital marketing");
        assert_eq!(resolve_prize(136), "Free Tablet on programs over 1,00,000 Rs for working professionals");
        // normalized 90 | 89
        assert_eq!(resolve_prize(180), "Free Tablet on programs over 1,00,000 Rs for working professionals");
        assert_eq!(resolve_prize(181), ONSPOT);
        // normalized 45 | 44
        assert_eq!(resolve_prize(225), ONSPOT);
        assert_eq!(resolve_prize(226), NO_PRIZE_LABEL);
        // normalized 0 | 359 across the wrap
        assert_eq!(resolve_prize(270), NO_PRIZE_LABEL);
        assert_eq!(resolve_prize(271), "Exclusive Upgrad Merchandise");
        // normalized 315 | 314
        assert_eq!(resolve_prize(315), "Exclusive Upgrad Merchandise");
        assert_eq!(resolve_prize(316), "Free Certification course in Data Science");
    }

    #[test]
    fn test_draw_angle_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(draw_angle(&mut rng) < 360);
        }
    }

    #[test]
    fn test_total_rotation_is_decorative() {
        assert_eq!(total_rotation(30), -(1800 + 30) - 12);
        assert_eq!(SpinOutcome::from_angle(30).prize, LAPTOPS);
    }

    #[test]
    fn test_outcome_text() {
        let win = SpinOutcome::from_angle(30);
        assert!(win.is_win());
        assert_eq!(win.headline(Some("Asha")), "Congratulations! Asha, You've won:");
        assert!(win.claim_hint(Some("a@b.com")).unwrap().contains("a@b.com"));

        let lose = SpinOutcome::from_angle(46);
        assert!(!lose.is_win());
        assert_eq!(lose.headline(None), "Almost there! Better luck next time!");
        assert_eq!(lose.claim_hint(Some("a@b.com")), None);
    }

    #[test]
    fn test_wheel_ignores_second_spin() {
        let mut wheel = Wheel::new();
        assert!(wheel.start_spin(30));
        let rotation = wheel.rotation;
        assert!(!wheel.start_spin(200));
        assert_eq!(wheel.rotation, rotation);
        wheel.complete_spin();
        assert!(!wheel.is_spinning);
        assert!(wheel.start_spin(200));
        assert_eq!(wheel.rotation, total_rotation(200));
    }
}
