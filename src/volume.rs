//! Volumetric drawing engine: four dense scalar buffers, a selectable
//! source/destination pair, a current operator, and range-gated writes.
//! Composes noise and fractal primitives into buffers later consumed as
//! chunk-seeding content.

use crate::noise_source::NoiseSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    Add,
    Sub,
    Mul,
    Set,
}

#[derive(Debug, Clone, Copy)]
struct Range {
    lo: f64,
    hi: f64,
}

impl Range {
    fn contains(&self, v: f64) -> bool {
        v >= self.lo && v <= self.hi
    }
}

pub struct VolumeDraw {
    edge: usize,
    buffers: [Vec<f64>; 4],
    src: usize,
    dst: usize,
    op: DrawOp,
    dst_range: Range,
    src_range: Range,
}

impl VolumeDraw {
    /// Allocates four zeroed `edge^3` buffers; selects buffer 0 as source,
    /// buffer 1 as destination; resets both ranges to `[0, 1]` and the
    /// operator to `SET`.
    pub fn alloc(edge: usize) -> Self {
        let len = edge * edge * edge;
        VolumeDraw {
            edge,
            buffers: [
                vec![0.0; len],
                vec![0.0; len],
                vec![0.0; len],
                vec![0.0; len],
            ],
            src: 0,
            dst: 1,
            op: DrawOp::Set,
            dst_range: Range { lo: 0.0, hi: 1.0 },
            src_range: Range { lo: 0.0, hi: 1.0 },
        }
    }

    pub fn edge(&self) -> usize {
        self.edge
    }

    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.edge + z * self.edge * self.edge
    }

    pub fn set_dst_range(&mut self, a: f64, b: f64) {
        self.dst_range = Range { lo: a, hi: b };
    }

    pub fn set_src_range(&mut self, a: f64, b: f64) {
        self.src_range = Range { lo: a, hi: b };
    }

    /// Index clamped to `<= 3` rather than rejected, so a caller passing an
    /// out-of-range buffer id degrades to the last buffer instead of
    /// panicking or erroring.
    pub fn set_dst(&mut self, i: usize) {
        self.dst = i.min(3);
    }

    pub fn set_src(&mut self, i: usize) {
        self.src = i.min(3);
    }

    pub fn set_op(&mut self, op: DrawOp) {
        self.op = op;
    }

    pub fn dst_at(&self, x: usize, y: usize, z: usize) -> f64 {
        self.buffers[self.dst][self.idx(x, y, z)]
    }

    pub fn src_at(&self, x: usize, y: usize, z: usize) -> f64 {
        self.buffers[self.src][self.idx(x, y, z)]
    }

    /// Gated per-cell operator application: a no-op if either the current
    /// destination or source value falls outside its configured range.
    pub fn op(&mut self, x: usize, y: usize, z: usize, val: f64) {
        let i = self.idx(x, y, z);
        if !self.dst_range.contains(self.buffers[self.dst][i]) {
            return;
        }
        if !self.src_range.contains(self.buffers[self.src][i]) {
            return;
        }
        let dst = &mut self.buffers[self.dst][i];
        match self.op {
            DrawOp::Add => *dst += val,
            DrawOp::Sub => *dst = (*dst - val).max(0.0),
            DrawOp::Mul => *dst *= val,
            DrawOp::Set => *dst = val,
        }
    }

    fn each_cell(&self) -> Vec<(usize, usize, usize)> {
        let edge = self.edge;
        let mut out = Vec::with_capacity(edge * edge * edge);
        for z in 0..edge {
            for y in 0..edge {
                for x in 0..edge {
                    out.push((x, y, z));
                }
            }
        }
        out
    }

    /// Applies the operator with constant `val` everywhere.
    pub fn fill_val(&mut self, val: f64) {
        for (x, y, z) in self.each_cell() {
            self.op(x, y, z, val);
        }
    }

    /// Applies the operator with `v = src[x,y,z]` everywhere.
    pub fn fill_src(&mut self) {
        for (x, y, z) in self.each_cell() {
            let v = self.src_at(x, y, z);
            self.op(x, y, z, v);
        }
    }

    /// Applies the operator with `v = src[x,y,z]` only where `src in [a, b)`.
    pub fn fill_src_range(&mut self, a: f64, b: f64) {
        for (x, y, z) in self.each_cell() {
            let v = self.src_at(x, y, z);
            if v >= a && v < b {
                self.op(x, y, z, v);
            }
        }
    }

    /// For every `dst` in `[a, b]`, replace with `lerp(j, k, dst - a)`.
    ///
    /// When `a > b`, both bounds collapse to `b` instead of swapping to
    /// `(b, a)`: a sequential `tmp = a; a = b; b = a;` reassigns `a` first
    /// and then copies that *new* value of `a` into `b`, discarding the
    /// original `a` entirely rather than exchanging the two. Callers should
    /// pass an already-normalized range; this is kept verbatim since it is
    /// part of the observed contract rather than an oversight to silently
    /// correct.
    pub fn map_range(&mut self, a: f64, b: f64, j: f64, k: f64) {
        let (lo, hi) = if a > b { (b, b) } else { (a, b) };

        for (x, y, z) in self.each_cell() {
            let v = self.dst_at(x, y, z);
            if v >= lo && v <= hi {
                let mapped = lerp(j, k, v - lo);
                let i = self.idx(x, y, z);
                self.buffers[self.dst][i] = mapped;
            }
        }
    }

    /// Samples `noise` at scale `factor^(octaves-i)` and amplitude
    /// `persistence^i` for `i` in `0..=octaves`, accumulating directly into
    /// the destination buffer bypassing the operator and both ranges, then
    /// dividing every cell by the total accumulated amplitude.
    pub fn fill_noise_octaves(
        &mut self,
        noise: &dyn NoiseSource,
        octaves: u32,
        factor: f64,
        persistence: f64,
    ) {
        let mut amp_correction = 0.0;
        let cells = self.each_cell();

        for i in 0..=octaves {
            let scale = factor.powi((octaves - i) as i32);
            let amp = persistence.powi(i as i32);
            amp_correction += amp;

            for &(x, y, z) in &cells {
                let s = noise.sample(x as i32, y as i32, z as i32, scale);
                let val = s as f64 / u32::MAX as f64;
                let i = self.idx(x, y, z);
                self.buffers[self.dst][i] += val * amp;
            }
        }

        for &(x, y, z) in &cells {
            let i = self.idx(x, y, z);
            self.buffers[self.dst][i] /= amp_correction;
        }
    }

    /// Recursively subdivides a cube into octants, writing a soft sphere
    /// at each level blended against `src`.
    pub fn sphere_subdiv(&mut self, x: f64, y: f64, z: f64, size: f64, filled: f64, lvl: i32) {
        let cntr = size / 2.0;
        let radius = cntr - size / 10.0;

        let isize = axis_count(size);
        for j in 0..isize {
            for k in 0..isize {
                for l in 0..isize {
                    let (jf, kf, lf) = (j as f64, k as f64, l as f64);
                    let dx = jf - cntr;
                    let dy = kf - cntr;
                    let dz = lf - cntr;
                    let vlen = (dx * dx + dy * dy + dz * dz).sqrt();
                    let diff = vlen - radius;

                    if diff < 0.0 {
                        let sphere_val = -diff / cntr;
                        let wx = (x + jf) as i64;
                        let wy = (y + kf) as i64;
                        let wz = (z + lf) as i64;
                        if !self.in_bounds(wx, wy, wz) {
                            continue;
                        }
                        let (wx, wy, wz) = (wx as usize, wy as usize, wz as usize);
                        let src_val = self.src_at(wx, wy, wz);

                        let blended = if filled < 0.0 {
                            lerp(sphere_val, src_val, -filled)
                        } else {
                            lerp(1.0 - sphere_val, src_val, filled)
                        };
                        self.op(wx, wy, wz, blended);
                    }
                }
            }
        }

        if lvl > 1 {
            let c = cntr;
            for (ox, oy, oz) in [
                (0.0, 0.0, 0.0),
                (0.0, 0.0, c),
                (c, 0.0, 0.0),
                (c, 0.0, c),
                (0.0, c, 0.0),
                (0.0, c, c),
                (c, c, 0.0),
                (c, c, c),
            ] {
                self.sphere_subdiv(x + ox, y + oy, z + oz, c, filled, lvl - 1);
            }
        }
    }

    /// At `lvl == 0`, fills the cube with `src`. Otherwise partitions into
    /// a 3x3x3 grid and recurses into any sub-cube whose count of
    /// coordinates in `{0, 2}` is `>= 2` -- the 8 corners and 12 edges,
    /// dropping the 6 face-centers and the 1 center (20 of 27 sub-cubes).
    pub fn menger_sponge_box(&mut self, x: f64, y: f64, z: f64, size: f64, lvl: i32) {
        if lvl == 0 {
            self.fill_cube_from_src(x, y, z, size);
            return;
        }

        let s3 = size / 3.0;
        for j in 0..3 {
            for k in 0..3 {
                for l in 0..3 {
                    let mut cnt = 0;
                    if j == 0 || j == 2 {
                        cnt += 1;
                    }
                    if k == 0 || k == 2 {
                        cnt += 1;
                    }
                    if l == 0 || l == 2 {
                        cnt += 1;
                    }
                    if cnt < 2 {
                        continue;
                    }
                    self.menger_sponge_box(
                        x + j as f64 * s3,
                        y + k as f64 * s3,
                        z + l as f64 * s3,
                        s3,
                        lvl - 1,
                    );
                }
            }
        }
    }

    /// At `lvl == 0`, fills the cube with `src`. The base case returns
    /// immediately on the first out-of-bounds voxel rather than clipping
    /// individual voxels -- so a partially in-bounds leaf cube can be
    /// truncated early. Every voxel that *is* written remains within
    /// bounds, which is what scenario S6 pins.
    pub fn cantor_dust_box(&mut self, x: f64, y: f64, z: f64, size: f64, lvl: i32) {
        if lvl == 0 {
            let isize = axis_count(size);
            for j in 0..isize {
                for k in 0..isize {
                    for l in 0..isize {
                        let xi = (x + j as f64) as i64;
                        let yi = (y + k as f64) as i64;
                        let zi = (z + l as f64) as i64;
                        if !self.in_bounds(xi, yi, zi) {
                            return;
                        }
                        let (xi, yi, zi) = (xi as usize, yi as usize, zi as usize);
                        let v = self.src_at(xi, yi, zi);
                        self.op(xi, yi, zi, v);
                    }
                }
            }
            return;
        }

        let rad = (lvl as f64).max(1.0);
        let size = size / 2.0 - rad;
        let offs = size + 2.0 * rad;

        for (ox, oy, oz) in [
            (0.0, 0.0, 0.0),
            (offs, 0.0, 0.0),
            (0.0, 0.0, offs),
            (offs, 0.0, offs),
            (0.0, offs, 0.0),
            (offs, offs, 0.0),
            (0.0, offs, offs),
            (offs, offs, offs),
        ] {
            self.cantor_dust_box(x + ox, y + oy, z + oz, size, lvl - 1);
        }
    }

    fn in_bounds(&self, x: i64, y: i64, z: i64) -> bool {
        let e = self.edge as i64;
        x >= 0 && y >= 0 && z >= 0 && x < e && y < e && z < e
    }

    fn fill_cube_from_src(&mut self, x: f64, y: f64, z: f64, size: f64) {
        let isize = axis_count(size);
        for j in 0..isize {
            for k in 0..isize {
                for l in 0..isize {
                    let xi = (x + j as f64) as i64;
                    let yi = (y + k as f64) as i64;
                    let zi = (z + l as f64) as i64;
                    if !self.in_bounds(xi, yi, zi) {
                        continue;
                    }
                    let (xi, yi, zi) = (xi as usize, yi as usize, zi as usize);
                    let v = self.src_at(xi, yi, zi);
                    self.op(xi, yi, zi, v);
                }
            }
        }
    }
}

/// Number of integer steps `j` satisfying `(j as f64) < size`, `j` starting
/// at 0 -- matches the source's `for (j = 0; j < size; j++)` float-compared
/// loop, which runs one extra layer over `size.floor()` whenever `size` is
/// non-integer (e.g. `size = 1.5` iterates `j = 0, 1`).
fn axis_count(size: f64) -> i64 {
    size.ceil().max(0.0) as i64
}

fn lerp(a: f64, b: f64, x: f64) -> f64 {
    a * (1.0 - x) + b * x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_source::PerlinNoiseSource;

    #[test]
    fn scenario_s5_set_with_dst_range_gate() {
        let mut v = VolumeDraw::alloc(4);
        v.set_dst_range(0.0, 0.0);
        v.set_op(DrawOp::Set);
        v.fill_val(0.5);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert_eq!(v.dst_at(x, y, z), 0.5);
                }
            }
        }

        v.set_dst_range(1.0, 1.0);
        v.fill_val(0.0);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert_eq!(v.dst_at(x, y, z), 0.5);
                }
            }
        }
    }

    #[test]
    fn scenario_s6_cantor_dust_stays_in_bounds() {
        let mut v = VolumeDraw::alloc(8);
        v.set_op(DrawOp::Set);
        v.cantor_dust_box(0.0, 0.0, 0.0, 8.0, 2);
    }

    #[test]
    fn property_menger_sponge_fills_twenty_unit_cubes_at_level_one() {
        let mut v = VolumeDraw::alloc(3);
        v.set_op(DrawOp::Add);
        v.set_src(0);
        v.set_dst(1);
        for cell in v.buffers[0].iter_mut() {
            *cell = 1.0;
        }
        v.menger_sponge_box(0.0, 0.0, 0.0, 3.0, 1);

        let filled = (0..3)
            .flat_map(|z| (0..3).flat_map(move |y| (0..3).map(move |x| (x, y, z))))
            .filter(|&(x, y, z)| v.dst_at(x, y, z) != 0.0)
            .count();
        assert_eq!(filled, 20);
    }

    #[test]
    fn map_range_preserves_bound_collapse_quirk() {
        let mut v = VolumeDraw::alloc(2);
        v.set_op(DrawOp::Set);
        v.set_dst(1);
        let idx = v.idx(0, 0, 0);
        v.buffers[1][idx] = 0.5;

        v.map_range(1.0, 0.0, 10.0, 20.0);
        // a > b collapses both bounds to the original b (0.0); a cell at
        // 0.5 does not fall in [0.0, 0.0] so it is left untouched.
        assert_eq!(v.dst_at(0, 0, 0), 0.5);
    }

    #[test]
    fn property_noise_determinism_same_seed_same_buffer() {
        let noise_a = PerlinNoiseSource::new(7);
        let noise_b = PerlinNoiseSource::new(7);

        let mut va = VolumeDraw::alloc(3);
        va.fill_noise_octaves(&noise_a, 2, 2.0, 0.5);

        let mut vb = VolumeDraw::alloc(3);
        vb.fill_noise_octaves(&noise_b, 2, 2.0, 0.5);

        assert_eq!(va.buffers[va.dst], vb.buffers[vb.dst]);
    }
}
