use rand::Rng;

pub const BACKSPACE_KEY: &str = "Backspace";

/// `key` value a real keystroke for this character would carry.
pub fn dom_key(c: char) -> String {
    match c {
        '\n' => "Enter".to_string(),
        _ => c.to_string(),
    }
}

/// `code` value for the physical key producing this character on a US
/// layout. Characters without an obvious physical key map to Unidentified,
/// which is what host pages see for exotic input anyway.
pub fn dom_code(c: char) -> String {
    match c {
        ' ' => "Space".to_string(),
        '\n' => "Enter".to_string(),
        c if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
        c if c.is_ascii_digit() => format!("Digit{c}"),
        _ => "Unidentified".to_string(),
    }
}

pub fn qwerty_adjacent_char(c: char, rng: &mut impl Rng) -> Option<char> {
    let (base, make_upper) = if c.is_ascii_uppercase() {
        (c.to_ascii_lowercase(), true)
    } else {
        (c, false)
    };

    let neighbors: &[char] = match base {
        'a' => &['q', 'w', 's', 'z', 'x'],
        'b' => &['v', 'g', 'h', 'n'],
        'c' => &['x', 'd', 'f', 'v'],
        'd' => &['s', 'e', 'r', 'f', 'c', 'x'],
        'e' => &['w', 's', 'd', 'r'],
        'f' => &['d', 'r', 't', 'g', 'v', 'c'],
        'g' => &['f', 't', 'y', 'h', 'b', 'v'],
        'h' => &['g', 'y', 'u', 'j', 'n', 'b'],
        'i' => &['u', 'j', 'k', 'o'],
        'j' => &['h', 'u', 'i', 'k', 'm', 'n'],
        'k' => &['j', 'i', 'o', 'l', ',', 'm'],
        'l' => &['k', 'o', 'p', ';', '.'],
        'm' => &['n', 'j', 'k', ','],
        'n' => &['b', 'h', 'j', 'm'],
        'o' => &['i', 'k', 'l', 'p'],
        'p' => &['o', 'l', '['],
        'q' => &['w', 'a'],
        'r' => &['e', 'd', 'f', 't'],
        's' => &['a', 'w', 'e', 'd', 'x', 'z'],
        't' => &['r', 'f', 'g', 'y'],
        'u' => &['y', 'h', 'j', 'i'],
        'v' => &['c', 'f', 'g', 'b'],
        'w' => &['q', 'a', 's', 'e'],
        'x' => &['z', 's', 'd', 'c'],
        'y' => &['t', 'g', 'h', 'u'],
        'z' => &['a', 's', 'x'],
        '1' => &['2', 'q'],
        '2' => &['1', '3', 'q', 'w'],
        '3' => &['2', '4', 'w', 'e'],
        '4' => &['3', '5', 'e', 'r'],
        '5' => &['4', '6', 'r', 't'],
        '6' => &['5', '7', 't', 'y'],
        '7' => &['6', '8', 'y', 'u'],
        '8' => &['7', '9', 'u', 'i'],
        '9' => &['8', '0', 'i', 'o'],
        '0' => &['9', 'o', 'p'],
        _ => return None,
    };

    let chosen = neighbors[rng.gen_range(0..neighbors.len())];
    Some(if make_upper {
        chosen.to_ascii_uppercase()
    } else {
        chosen
    })
}

/// Fallback when the intended character has no adjacency group: any letter
/// from a random QWERTY letter row.
pub fn random_row_char(rng: &mut impl Rng) -> char {
    const ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];
    let row = ROWS[rng.gen_range(0..ROWS.len())];
    let bytes = row.as_bytes();
    bytes[rng.gen_range(0..bytes.len())] as char
}
