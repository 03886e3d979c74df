use super::*;

/// Records every painted cell so tests can assert rendering behavior.
#[derive(Default)]
struct RecordingPainter {
    calls: Vec<(CellRect, String)>,
}

impl CellPainter for RecordingPainter {
    fn paint_cell(&mut self, rect: CellRect, color: &str) {
        self.calls.push((rect, color.to_owned()));
    }
}

fn mirror_2x2() -> CanvasMirror<RecordingPainter> {
    CanvasMirror::new(PixelGrid::new(2, 2), 200.0, 200.0, RecordingPainter::default())
}

fn diff(pixel: Pixel, indices: Vec<usize>) -> Diff {
    Diff { pixel, indices }
}

#[test]
fn init_renders_every_cell_scaled() {
    let mirror = mirror_2x2();
    let calls = &mirror.painter().calls;
    assert_eq!(calls.len(), 4);
    // 200/2 = 100px per logical cell.
    assert_eq!(calls[0].0, CellRect { x: 0.0, y: 0.0, width: 100.0, height: 100.0 });
    assert_eq!(calls[3].0, CellRect { x: 100.0, y: 100.0, width: 100.0, height: 100.0 });
    assert!(calls.iter().all(|(_, color)| color == "#ffffff"));
}

#[test]
fn apply_diff_sets_cells_and_repaints() {
    let mut mirror = mirror_2x2();
    let blue = Pixel::rgba(0, 0, 255, 255);

    mirror.apply_diff(&diff(blue, vec![0, 3]));

    assert_eq!(mirror.grid().get(0).unwrap(), blue);
    assert_eq!(mirror.grid().get(3).unwrap(), blue);
    assert_eq!(mirror.grid().get(1).unwrap(), Pixel::WHITE);
    let last = mirror.painter().calls.last().unwrap();
    assert_eq!(last.1, "#0000ff");
}

#[test]
fn apply_diff_is_idempotent() {
    let mut mirror = mirror_2x2();
    let color = Pixel::rgba(10, 20, 30, 255);
    let d = diff(color, vec![0, 1]);

    mirror.apply_diff(&d);
    let after_once = mirror.grid().clone();
    mirror.apply_diff(&d);

    assert_eq!(*mirror.grid(), after_once);
}

#[test]
fn revert_restores_prior_values() {
    let mut mirror = mirror_2x2();
    let color = Pixel::rgba(10, 20, 30, 255);
    let d = diff(color, vec![0, 1]);

    mirror.apply_diff(&d);
    mirror.apply_revert(&d.to_revert());

    assert_eq!(mirror.grid().get(0).unwrap(), Pixel::WHITE);
    assert_eq!(mirror.grid().get(1).unwrap(), Pixel::WHITE);
}

#[test]
fn revert_skips_superseded_cells() {
    let mut mirror = mirror_2x2();
    let a = Pixel::rgba(100, 0, 0, 255);
    let b = Pixel::rgba(0, 100, 0, 255);

    mirror.apply_diff(&diff(a, vec![0, 1]));
    // A later paint supersedes cell 0.
    mirror.apply_diff(&diff(b, vec![0]));

    // Reverting the first diff must roll back cell 1 but leave cell 0 at B.
    mirror.apply_revert(&diff(a, vec![0, 1]).to_revert());

    assert_eq!(mirror.grid().get(0).unwrap(), b);
    assert_eq!(mirror.grid().get(1).unwrap(), Pixel::WHITE);
}

#[test]
fn failed_paint_rolls_back_to_previous_color_not_white() {
    // Paints A then B on the same cell; B's persistence fails, so the server
    // broadcasts B's revert. The cell must end at A.
    let mut mirror = mirror_2x2();
    let a = Pixel::rgba(100, 0, 0, 255);
    let b = Pixel::rgba(0, 100, 0, 255);

    mirror.apply_diff(&diff(a, vec![0]));
    let failed = diff(b, vec![0]);
    mirror.apply_diff(&failed);
    mirror.apply_revert(&failed.to_revert());

    assert_eq!(mirror.grid().get(0).unwrap(), a);
}

#[test]
fn revert_without_recorded_prior_is_a_noop() {
    let mut mirror = mirror_2x2();
    let ghost = diff(Pixel::WHITE, vec![2]);

    // Every cell is white, so the guard matches, but no prior was recorded.
    mirror.apply_revert(&ghost.to_revert());

    assert_eq!(mirror.grid().get(2).unwrap(), Pixel::WHITE);
}

#[test]
fn out_of_range_event_indices_are_skipped() {
    let mut mirror = mirror_2x2();
    let color = Pixel::rgba(1, 2, 3, 255);

    mirror.apply_diff(&diff(color, vec![0, 99]));
    mirror.apply_revert(&diff(color, vec![99]).to_revert());

    assert_eq!(mirror.grid().get(0).unwrap(), color);
}

#[test]
fn rgb_hex_zero_pads_channels() {
    assert_eq!(rgb_hex(Pixel::rgba(0, 1, 255, 255)), "#0001ff");
    assert_eq!(rgb_hex(Pixel::WHITE), "#ffffff");
}
