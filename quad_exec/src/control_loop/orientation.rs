//! Director angle from direction key states

/// Get the director angle for a set of forward, back, right and left key
/// states.
///
/// A pressed forward key is `+1` in slot 0, back `-1` in slot 1, right `-1`
/// in slot 2 and left `+1` in slot 3. Only the sign of each slot is used.
/// Opposite keys cancel out. Returns 0 if no direction results.
///
/// Units: degrees, 360 is forwards and 90 is right
pub fn orientation(fbrl: [i8; 4]) -> u16 {
    let [f, b, r, l] = fbrl.map(|k| k.signum() as i32);
    let fb = f + b;
    let rl = r + l;

    let angle = if fb != 0 && rl != 0 {
        let mut a = 45 * fb;
        if rl == -1 {
            a += 90 * fb;
        }
        a
    }
    else if fb != 0 {
        90 * fb
    }
    else if rl != 0 {
        (1 - rl) * 90
    }
    else {
        return 0;
    };

    let mut walk = angle + 270;
    if walk > 360 {
        walk -= 360;
    }

    walk as u16
}
