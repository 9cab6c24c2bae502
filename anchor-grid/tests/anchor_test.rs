use std::path::Path;

use anchor_grid::*;
use approx::assert_abs_diff_eq;

fn read_anchor_reference<P: AsRef<Path>>(input: P) -> Vec<[f32; 4]> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .from_path(input)
        .expect("Unable to open file");

    reader
        .records()
        .map(|r| {
            let row: [f32; 4] = r.unwrap().deserialize(None).unwrap();
            row
        })
        .collect()
}

fn generate(grid: Grid, sizes: &[f32], ratios: &[f32]) -> Vec<f32> {
    let mut output = vec![0.; AnchorLayout::new(grid, sizes.len(), ratios.len()).len()];
    generate_grid_anchors(&mut output, grid, sizes, ratios).unwrap();
    output
}

#[test]
fn test_golden_4x2() {
    let params = AnchorParams {
        width: 4,
        height: 2,
        sizes: vec![0.2, 0.6].into(),
        ratios: vec![1.0, 2.0, 0.5].into(),
        ..AnchorParams::default()
    };

    let anchors = params.generate::<f32>().unwrap();
    let reference = read_anchor_reference("tests/data/anchor_golden_4x2.txt");

    let boxes: Vec<_> = anchors.anchors().collect();
    assert_eq!(boxes.len(), reference.len());
    for (left, right) in boxes.iter().zip(reference.iter()) {
        let left = [left.xmin, left.ymin, left.xmax, left.ymax];
        for (l, r) in left.iter().zip(right) {
            assert_abs_diff_eq!(l, r, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_center_planes() {
    for &(width, height) in &[(1, 1), (2, 1), (5, 3), (16, 9)] {
        let grid = Grid::new(width, height);
        let output = generate(grid, &[0.3], &[1.5]);
        let plane = grid.cells();
        for row in 0..height {
            for col in 0..width {
                let index = row * width + col;
                assert_abs_diff_eq!(
                    output[index],
                    (col as f32 + 0.5) / width as f32,
                    epsilon = 1e-6
                );
                assert_abs_diff_eq!(
                    output[plane + index],
                    (row as f32 + 0.5) / height as f32,
                    epsilon = 1e-6
                );
            }
        }
    }
}

#[test]
fn test_box_extent_and_center() {
    let grid = Grid::new(6, 4);
    let sizes = [0.1f64, 0.45, 0.9];
    let ratios = [0.25f64, 1.0, 3.0];
    let mut output = vec![0.; AnchorLayout::new(grid, 3, 3).len()];
    generate_grid_anchors(&mut output, grid, &sizes, &ratios).unwrap();
    let anchors = AnchorMap::from_vec(AnchorLayout::new(grid, 3, 3), output).unwrap();

    for (size_index, &size) in sizes.iter().enumerate() {
        for (ratio_index, &ratio) in ratios.iter().enumerate() {
            for row in 0..grid.height {
                for col in 0..grid.width {
                    let [xmin, ymin, xmax, ymax] =
                        anchors.anchor(size_index, ratio_index, row, col).unwrap();
                    let (cx, cy) = anchors.center(row, col).unwrap();
                    assert_abs_diff_eq!(xmax - xmin, size * ratio.sqrt(), epsilon = 1e-12);
                    assert_abs_diff_eq!(ymax - ymin, size / ratio.sqrt(), epsilon = 1e-12);
                    assert_abs_diff_eq!((xmin + xmax) / 2., cx, epsilon = 1e-12);
                    assert_abs_diff_eq!((ymin + ymax) / 2., cy, epsilon = 1e-12);
                }
            }
        }
    }
}

#[test]
fn test_two_cell_scenario() {
    let output = generate(Grid::new(2, 1), &[1.0], &[1.0]);
    let anchors = AnchorMap::from_vec(AnchorLayout::new(Grid::new(2, 1), 1, 1), output).unwrap();
    assert_eq!(anchors.center(0, 0), Some((0.25, 0.5)));
    assert_eq!(anchors.center(0, 1), Some((0.75, 0.5)));
    assert_eq!(anchors.anchor(0, 0, 0, 0), Some([-0.25, 0.0, 0.75, 1.0]));
}

#[test]
fn test_single_cell_channel_order() {
    let sizes = [0.5f32, 1.0];
    let ratios = [1.0f32, 4.0];
    let layout = AnchorLayout::new(Grid::new(1, 1), sizes.len(), ratios.len());
    assert_eq!(layout.channels(), 18);

    let output = generate(Grid::new(1, 1), &sizes, &ratios);
    assert_eq!(output.len(), 18);
    assert_eq!(&output[..2], &[0.5, 0.5]);

    let expected_pairs = [(0.5f32, 1.0f32), (0.5, 4.0), (1.0, 1.0), (1.0, 4.0)];
    for (pair, block) in output[2..].chunks(4).enumerate() {
        let (size, ratio) = expected_pairs[pair];
        let width = block[2] - block[0];
        let height = block[3] - block[1];
        assert_abs_diff_eq!(width / height, ratio, epsilon = 1e-5);
        assert_abs_diff_eq!(width, size * ratio.sqrt(), epsilon = 1e-6);
        if ratio == 1.0 {
            assert_abs_diff_eq!(width * height, size * size, epsilon = 1e-6);
        }
        assert_abs_diff_eq!((block[0] + block[2]) / 2., 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!((block[1] + block[3]) / 2., 0.5, epsilon = 1e-6);
    }
}

#[test]
fn test_idempotent() {
    let grid = Grid::new(19, 11);
    let sizes = [0.05f32, 0.2, 0.7];
    let ratios = [1.0f32, 2.0, 0.5, 3.0, 1.0 / 3.0];
    let first = generate(grid, &sizes, &ratios);
    let second = generate(grid, &sizes, &ratios);
    assert!(first
        .iter()
        .zip(second.iter())
        .all(|(a, b)| a.to_bits() == b.to_bits()));
}

#[test]
fn test_overwrites_buffer() {
    let grid = Grid::new(3, 3);
    let layout = AnchorLayout::new(grid, 1, 2);
    let mut dirty = vec![f32::NAN; layout.len()];
    generate_grid_anchors(&mut dirty, grid, &[0.4], &[1.0, 2.0]).unwrap();
    assert!(dirty.iter().all(|v| v.is_finite()));
    assert_eq!(dirty, generate(grid, &[0.4], &[1.0, 2.0]));
}

#[test]
fn test_parameter_file() {
    let params: AnchorParams = serde_json::from_str(
        r#"{"width": 2, "height": 1, "sizes": "(1.0,)", "ratios": "(1.0,)", "batch_width": 1, "threads": 2}"#,
    )
    .unwrap();
    let anchors = params.generate::<f32>().unwrap();
    assert_eq!(
        anchors.as_slice(),
        &[0.25, 0.75, 0.5, 0.5, -0.25, 0.25, 0.0, 0.0, 0.75, 1.25, 1.0, 1.0]
    );
}
