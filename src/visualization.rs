//! Visualization utilities for TSP solutions.
//!
//! Generates SVG drawings of a closed tour over the instance's cities.

use crate::instance::TspInstance;
use crate::solution::Solution;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// City radius
    pub node_radius: f64,
    /// Draw city indices next to each city
    pub show_labels: bool,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 4.0,
            show_labels: true,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate SVG visualization of a solution
    pub fn generate_svg(&self, instance: &TspInstance, solution: &Solution) -> String {
        let mut svg = String::new();

        let (min_x, max_x, min_y, max_y) = self.get_bounds(instance);

        // degenerate extents (single city, collinear cities) still get a finite scale
        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1e-9);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1e-9);
        let scale = scale_x.min(scale_y);

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .city {{ fill: #3498db; stroke: #2c3e50; stroke-width: 1; }}
    .start {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 1; }}
    .edge {{ stroke: #34495e; stroke-width: 1.5; fill: none; }}
    .label {{ font-family: Arial; font-size: 9px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">Instance: {} | Cities: {} | Cost: {:.2}</text>
"##,
            self.margin, instance.name, instance.dimension, solution.cost
        ));

        let transform = |x: f64, y: f64| -> (f64, f64) {
            let tx = self.margin + (x - min_x) * scale;
            let ty = self.height - self.margin - (y - min_y) * scale;
            (tx, ty)
        };

        if solution.tour.len() > 1 {
            let points: Vec<String> = solution
                .tour
                .iter()
                .map(|&c| {
                    let (x, y) = transform(instance.cities[c].x, instance.cities[c].y);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();
            svg.push_str(&format!(
                r##"<polygon points="{}" class="edge"/>
"##,
                points.join(" ")
            ));
        }

        let start = solution.tour.first().copied();
        for (id, city) in instance.cities.iter().enumerate() {
            let (x, y) = transform(city.x, city.y);
            let class = if Some(id) == start { "start" } else { "city" };

            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x, y, self.node_radius, class
            ));

            if self.show_labels {
                svg.push_str(&format!(
                    r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                    x,
                    y - self.node_radius - 2.0,
                    id
                ));
            }
        }

        svg.push_str("</svg>");

        svg
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Get coordinate bounds
    fn get_bounds(&self, instance: &TspInstance) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for city in &instance.cities {
            min_x = min_x.min(city.x);
            max_x = max_x.max(city.x);
            min_y = min_y.min(city.y);
            max_y = max_y.max(city.y);
        }

        (min_x, max_x, min_y, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn create_test_instance() -> TspInstance {
        TspInstance::from_points(
            "test",
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)],
        )
    }

    #[test]
    fn test_visualizer() {
        let instance = create_test_instance();
        let solution = Solution::from_tour(&instance, vec![0, 1, 2], "test");

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &solution);

        assert!(svg.starts_with("<?xml"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Instance: test"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert_eq!(svg.matches("class=\"start\"").count(), 1);
    }

    #[test]
    fn test_single_city_has_no_edges() {
        let instance = TspInstance::from_points("one", vec![Point::new(3.0, 3.0)]);
        let solution = Solution::from_tour(&instance, vec![0], "test");

        let viz = Visualizer { show_labels: false, ..Visualizer::default() };
        let svg = viz.generate_svg(&instance, &solution);

        assert!(!svg.contains("<polygon"));
        assert!(!svg.contains("class=\"label\""));
        assert!(svg.contains("<circle"));
    }
}
