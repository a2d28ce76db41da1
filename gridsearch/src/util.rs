use anyhow::bail;
use image::{DynamicImage, GenericImageView};

use crate::grid::{Grid, Point};

/// Builds a grid from a thresholded image, one cell per pixel. Dark pixels
/// (red channel below 128) become obstacles.
pub fn grid_from_image(img: &DynamicImage) -> Result<Grid, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    if width == 0 || height == 0 {
        bail!("Image is empty ({}x{})", width, height);
    }

    let mut grid = Grid::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let p = img.get_pixel(x as u32, y as u32);

            if p.0[0] < 128 {
                grid.set_obstacle(Point { x, y }, true);
            }
        }
    }

    Ok(grid)
}
