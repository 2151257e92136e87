use rand::seq::SliceRandom;
use rand::Rng;

const CONFETTI: [char; 8] = ['*', '✦', '✧', '•', '🎃', '🦇', '👻', '🍬'];
const GRAVITY: f64 = 9.0;

/// One piece of confetti, or one letter of the banner
#[derive(Debug, Clone)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    pub is_text: bool,
    pub target_x: f64,
    pub target_y: f64,
}

impl ConfettiParticle {
    fn falling<R: Rng + ?Sized>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-2.0..2.0),
            vel_y: rng.gen_range(0.5..3.0),
            symbol: *CONFETTI.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.5..4.5),
            is_text: false,
            target_x: x,
            target_y: y,
        }
    }

    fn letter(x: f64, y: f64, target_x: f64, target_y: f64, symbol: char, color: usize) -> Self {
        Self {
            x,
            y,
            vel_x: target_x - x,
            vel_y: target_y - y,
            symbol,
            color_index: color,
            age: 0.0,
            max_age: 4.0,
            is_text: true,
            target_x,
            target_y,
        }
    }

    /// Step the particle; false once it has burnt out
    fn update(&mut self, dt: f64) -> bool {
        if self.is_text {
            let dist = ((self.target_x - self.x).powi(2) + (self.target_y - self.y).powi(2)).sqrt();
            if dist > 1.0 {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_x *= 0.95;
                self.vel_y *= 0.95;
            } else {
                self.x = self.target_x;
                self.y = self.target_y;
                self.vel_x = 0.0;
                self.vel_y = 0.0;
            }
        } else {
            self.x += self.vel_x * dt;
            self.y += self.vel_y * dt;
            self.vel_y += GRAVITY * dt;
            // flutter
            self.vel_x *= 0.98;
        }

        self.age += dt;
        self.age < self.max_age
    }
}

/// Game-over confetti shower
#[derive(Debug)]
pub struct Confetti {
    pub particles: Vec<ConfettiParticle>,
    pub elapsed: f64,
    pub duration: f64,
    pub is_active: bool,
    pub width: f64,
    pub height: f64,
}

impl Confetti {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            elapsed: 0.0,
            duration: 4.0,
            is_active: false,
            width: 80.0,
            height: 24.0,
        }
    }

    /// Throw confetti over a `width` x `height` area with `banner` spelled
    /// out in the middle
    pub fn start(&mut self, width: u16, height: u16, banner: &str) {
        let mut rng = rand::thread_rng();
        self.start_with(width, height, banner, &mut rng);
    }

    pub fn start_with<R: Rng + ?Sized>(&mut self, width: u16, height: u16, banner: &str, rng: &mut R) {
        self.particles.clear();
        self.elapsed = 0.0;
        self.is_active = true;
        self.width = f64::from(width);
        self.height = f64::from(height);

        let center_x = self.width / 2.0;
        let center_y = self.height / 3.0;
        let spacing = 2.0;
        let left = center_x - (banner.chars().count() as f64 - 1.0) * spacing / 2.0;
        for (i, ch) in banner.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            self.particles.push(ConfettiParticle::letter(
                center_x + rng.gen_range(-10.0..10.0),
                self.height,
                left + i as f64 * spacing,
                center_y,
                ch,
                rng.gen_range(0..7),
            ));
        }

        let pieces = (self.width as usize / 2).clamp(10, 60);
        for _ in 0..pieces {
            let x = rng.gen_range(0.0..self.width.max(1.0));
            let y = rng.gen_range(-4.0..1.0);
            self.particles.push(ConfettiParticle::falling(x, y, rng));
        }
    }

    pub fn update(&mut self, dt: f64) {
        if !self.is_active {
            return;
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.stop();
            return;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(dt);
            if p.is_text {
                return alive;
            }
            let margin = 2.0;
            let gone = p.y > height + margin || p.x < -margin || p.x > width + margin;
            alive && !gone
        });
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new()
    }
}

/// Banner shown over the confetti
pub fn banner(score: u32, max_score: u32) -> &'static str {
    if max_score > 0 && score == max_score {
        "PERFECT!"
    } else if score > 0 && score * 2 >= max_score {
        "SPOOKTACULAR!"
    } else {
        "GAME OVER"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn falling_confetti_accelerates() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut p = ConfettiParticle::falling(10.0, 0.0, &mut rng);
        let vel_y = p.vel_y;

        assert!(p.update(0.1));
        assert!(p.vel_y > vel_y);
        assert!(p.y > 0.0);
    }

    #[test]
    fn letters_settle_on_target() {
        let mut p = ConfettiParticle::letter(0.0, 20.0, 10.0, 5.0, 'A', 0);
        for _ in 0..30 {
            p.update(0.1);
        }
        let dist = ((p.target_x - p.x).powi(2) + (p.target_y - p.y).powi(2)).sqrt();
        assert!(dist < 5.0);
        assert_eq!(p.symbol, 'A');
    }

    #[test]
    fn start_spells_banner_and_throws_confetti() {
        let mut confetti = Confetti::new();
        assert!(!confetti.is_active);

        confetti.start_with(80, 24, "BOO", &mut StdRng::seed_from_u64(4));

        assert!(confetti.is_active);
        let letters: String = confetti
            .particles
            .iter()
            .filter(|p| p.is_text)
            .map(|p| p.symbol)
            .collect();
        assert_eq!(letters, "BOO");
        assert!(confetti.particles.iter().any(|p| !p.is_text));
    }

    #[test]
    fn shower_ends_after_duration() {
        let mut confetti = Confetti::new();
        confetti.start_with(40, 12, "YAY", &mut StdRng::seed_from_u64(4));

        for _ in 0..10 {
            confetti.update(0.1);
        }
        assert!(confetti.is_active);

        confetti.update(confetti.duration);
        assert!(!confetti.is_active);
        assert!(confetti.particles.is_empty());
    }

    #[test]
    fn off_screen_confetti_is_dropped() {
        let mut confetti = Confetti::new();
        confetti.start_with(20, 10, "", &mut StdRng::seed_from_u64(8));
        let mut rng = StdRng::seed_from_u64(9);
        confetti
            .particles
            .push(ConfettiParticle::falling(100.0, 100.0, &mut rng));

        confetti.update(0.1);

        assert!(confetti
            .particles
            .iter()
            .all(|p| p.x <= 22.0 && p.y <= 12.0));
    }

    #[test]
    fn banner_depends_on_score() {
        assert_eq!(banner(30, 30), "PERFECT!");
        assert_eq!(banner(16, 30), "SPOOKTACULAR!");
        assert_eq!(banner(3, 30), "GAME OVER");
        assert_eq!(banner(0, 0), "GAME OVER");
    }
}
