use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use eframe::egui::{Vec2, vec2};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(1240.0, 600.0)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    pub canvas: CanvasSize,
    pub radius_range: [f32; 2],
    pub radius_exponent: f64,
    pub position_strength: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub theta: f32,
    pub title_y: f32,
    pub ticks_per_second: f32,
    pub max_ticks_per_frame: u32,
    pub currency_prefix: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            canvas: CanvasSize::default(),
            radius_range: [2.0, 45.0],
            radius_exponent: 0.5,
            position_strength: 0.03,
            velocity_decay: 0.2,
            alpha_min,
            // Cools from 1 to `alpha_min` in 300 ticks.
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            theta: 0.9,
            title_y: 40.0,
            ticks_per_second: 60.0,
            max_ticks_per_frame: 4,
            currency_prefix: "$".to_owned(),
        }
    }
}

impl ChartConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read chart config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid chart config JSON in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            bail!(
                "canvas must have a positive size, got {}x{}",
                self.canvas.width,
                self.canvas.height
            );
        }

        let [min_radius, max_radius] = self.radius_range;
        if !(min_radius >= 0.0 && max_radius >= min_radius) {
            bail!("radius range [{min_radius}, {max_radius}] is not ascending and non-negative");
        }

        if !(self.radius_exponent > 0.0) {
            bail!("radius exponent must be positive, got {}", self.radius_exponent);
        }

        if !(0.0..1.0).contains(&self.velocity_decay) {
            bail!("velocity decay must be in [0, 1), got {}", self.velocity_decay);
        }

        if !(self.alpha_decay > 0.0 && self.alpha_decay < 1.0) {
            bail!("alpha decay must be in (0, 1), got {}", self.alpha_decay);
        }

        if !(self.ticks_per_second > 0.0) {
            bail!("ticks per second must be positive, got {}", self.ticks_per_second);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_overlay_keeps_remaining_defaults() {
        let config: ChartConfig =
            serde_json::from_str(r#"{ "title_y": 55.0, "canvas": { "width": 800.0, "height": 400.0 } }"#)
                .expect("valid overlay");

        assert_eq!(config.title_y, 55.0);
        assert_eq!(config.canvas, CanvasSize::new(800.0, 400.0));
        assert_eq!(config.radius_range, [2.0, 45.0]);
        assert_eq!(config.position_strength, 0.03);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_alpha_decay_cools_in_three_hundred_ticks() {
        let config = ChartConfig::default();
        let remaining = (1.0 - config.alpha_decay).powi(300);
        assert!((remaining - config.alpha_min).abs() < 1e-5);
    }

    #[test]
    fn rejects_degenerate_canvas() {
        let config = ChartConfig {
            canvas: CanvasSize::new(0.0, 600.0),
            ..ChartConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
