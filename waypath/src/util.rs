use std::path::Path;

use anyhow::{anyhow, bail, Context};
use image::DynamicImage;

use crate::grid::{CostSurface, Point};
use crate::planner::PlannerConfig;

/// Parses a cost grid: a `width height` header line followed by `height` lines of `width`
/// whitespace separated costs.
pub fn parse_cost_grid(text: &str) -> Result<CostSurface, anyhow::Error> {
    let mut lines = text.lines();
    let header = lines.next().ok_or(anyhow!("grid file is empty"))?;

    let mut dims = header.split_whitespace().map(str::parse::<i64>);
    let (Some(Ok(width)), Some(Ok(height))) = (dims.next(), dims.next()) else {
        bail!("error reading grid dimensions from header {:?}", header);
    };
    if width <= 0 || height <= 0 {
        bail!(
            "grid dimensions must be positive, given width={} height={}",
            width,
            height
        );
    }

    let mut cells = Vec::with_capacity(height as usize);
    for row in 0..height as usize {
        let line = lines
            .next()
            .with_context(|| format!("missing grid line {}", row + 1))?;
        let mut values = line.split_whitespace();

        let mut cost_row = Vec::with_capacity(width as usize);
        for col in 0..width as usize {
            let cost = values
                .next()
                .ok_or(anyhow!("missing grid value at row {}, column {}", row, col))?
                .parse::<f64>()
                .with_context(|| format!("error reading grid value at row {}, column {}", row, col))?;
            cost_row.push(cost);
        }
        cells.push(cost_row);
    }

    Ok(CostSurface::new(cells)?)
}

/// Parses a node list: the node count on the first line, then the `row col` position of
/// every node. Node indices follow the order of the positions.
pub fn parse_nodes(text: &str) -> Result<Vec<Point>, anyhow::Error> {
    let mut lines = text.lines();
    let header = lines.next().ok_or(anyhow!("nodes file is empty"))?;
    let count: usize = header
        .trim()
        .parse()
        .with_context(|| format!("failed to parse the number of nodes from {:?}", header))?;

    let mut values = lines.flat_map(str::split_whitespace);
    let mut positions = Vec::with_capacity(count);
    for idx in 0..count {
        let mut next = |what: &str| -> Result<usize, anyhow::Error> {
            let raw = values
                .next()
                .with_context(|| format!("missing {} index for node {}", what, idx))?;
            raw.parse::<usize>().with_context(|| {
                format!(
                    "{} index of node {} must be a non-negative integer, got {:?}",
                    what, idx, raw
                )
            })
        };
        let row = next("row")?;
        let col = next("column")?;
        positions.push(Point { row, col });
    }

    Ok(positions)
}

/// Converts an image into a cost surface. Bright pixels are cheap (cost 1), black pixels cost
/// `max_cost`, with a linear ramp in between.
pub fn parse_img(img: &DynamicImage, max_cost: f64) -> Result<CostSurface, anyhow::Error> {
    if max_cost < 1.0 {
        bail!("max_cost must be at least 1, got {}", max_cost);
    }

    let luma = img.to_luma8();
    let width = luma.width() as usize;
    let height = luma.height() as usize;

    let mut cells = vec![vec![1.0; width]; height];

    for row in 0..height {
        for col in 0..width {
            let p = luma.get_pixel(col as u32, row as u32);
            let darkness = f64::from(255 - p.0[0]) / 255.0;
            cells[row][col] = 1.0 + darkness * (max_cost - 1.0);
        }
    }

    Ok(CostSurface::new(cells)?)
}

/// Loads a cost surface, either from an image or from the text grid format
pub fn load_surface(path: &Path, max_cost: f64) -> Result<CostSurface, anyhow::Error> {
    if image::ImageFormat::from_path(path).is_ok() {
        let img = image::open(path).with_context(|| format!("reading image {}", path.display()))?;
        return parse_img(&img, max_cost);
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading grid file {}", path.display()))?;
    parse_cost_grid(&text).with_context(|| format!("parsing grid file {}", path.display()))
}

pub fn load_nodes(path: &Path) -> Result<Vec<Point>, anyhow::Error> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading nodes file {}", path.display()))?;
    parse_nodes(&text).with_context(|| format!("parsing nodes file {}", path.display()))
}

pub fn load_config(path: &Path) -> Result<PlannerConfig, anyhow::Error> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}
