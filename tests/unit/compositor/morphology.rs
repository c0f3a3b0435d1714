use super::*;

fn single_dot(w: u32, h: u32, x: u32, y: u32) -> Vec<u8> {
    let mut m = vec![0u8; (w * h) as usize];
    m[(y * w + x) as usize] = 255;
    m
}

#[test]
fn radius_zero_is_identity() {
    let m = single_dot(5, 5, 2, 2);
    assert_eq!(dilate_mask(&m, 5, 5, 0, Footprint::Disc).unwrap(), m);
}

#[test]
fn disc_matches_brute_force_union() {
    let (w, h, r) = (15u32, 13u32, 4u32);
    let mut m = vec![0u8; (w * h) as usize];
    m[(6 * w + 7) as usize] = 200;
    m[(2 * w + 3) as usize] = 90;
    m[(12 * w + 14) as usize] = 255;

    let out = dilate_mask(&m, w, h, r, Footprint::Disc).unwrap();

    let ri = r as i32;
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let mut expect = 0u8;
            for dy in -ri..=ri {
                for dx in -ri..=ri {
                    if dx * dx + dy * dy > ri * ri {
                        continue;
                    }
                    let (sx, sy) = (x - dx, y - dy);
                    if sx < 0 || sy < 0 || sx >= w as i32 || sy >= h as i32 {
                        continue;
                    }
                    expect = expect.max(m[(sy as u32 * w + sx as u32) as usize]);
                }
            }
            assert_eq!(out[(y as u32 * w + x as u32) as usize], expect, "at {x},{y}");
        }
    }
}

#[test]
fn square_covers_corners_disc_does_not() {
    let m = single_dot(7, 7, 3, 3);
    let sq = dilate_mask(&m, 7, 7, 2, Footprint::Square).unwrap();
    let disc = dilate_mask(&m, 7, 7, 2, Footprint::Disc).unwrap();
    assert_eq!(sq[7 + 1], 255);
    assert_eq!(disc[7 + 1], 0);
    assert_eq!(disc[3 * 7 + 1], 255);
}

#[test]
fn mismatched_mask_is_rejected() {
    assert!(dilate_mask(&[0u8; 3], 2, 2, 1, Footprint::Disc).is_err());
}
