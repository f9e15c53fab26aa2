//! Checked parsing of Hashids strings.
//!
//! [`HashidsLayout`] derives the same alphabet, separators and guards that
//! `harsh` builds from a salt and an alphabet, and splits a code back into
//! its numbers with overflow-checked arithmetic. Encoding stays with `harsh`.

const SEPARATORS: &[u8] = b"cfhistuCFHISTU";
const SEPARATOR_DIV: f64 = 3.5;
const GUARD_DIV: f64 = 12.0;

#[derive(Debug, Clone)]
pub(crate) struct HashidsLayout {
    alphabet: Vec<u8>,
    separators: Vec<u8>,
    guards: Vec<u8>,
    salt: Vec<u8>,
}

impl HashidsLayout {
    /// Expects an alphabet `harsh` already accepted: at least 16 distinct
    /// bytes, no spaces.
    pub(crate) fn new(alphabet: &[u8], salt: &[u8]) -> Self {
        let mut unique = Vec::with_capacity(alphabet.len());
        for &b in alphabet {
            if !unique.contains(&b) {
                unique.push(b);
            }
        }

        let mut separators: Vec<u8> = SEPARATORS
            .iter()
            .copied()
            .filter(|b| unique.contains(b))
            .collect();
        let mut alphabet: Vec<u8> = unique
            .into_iter()
            .filter(|b| !separators.contains(b))
            .collect();

        shuffle(&mut separators, salt);

        if separators.is_empty()
            || alphabet.len() as f64 / separators.len() as f64 > SEPARATOR_DIV
        {
            let length = match (alphabet.len() as f64 / SEPARATOR_DIV).ceil() as usize {
                1 => 2,
                n => n,
            };

            if length > separators.len() {
                let diff = length - separators.len();
                separators.extend(alphabet.drain(..diff));
            } else {
                separators.truncate(length);
            }
        }

        shuffle(&mut alphabet, salt);

        let guard_count = (alphabet.len() as f64 / GUARD_DIV).ceil() as usize;
        let guards = if alphabet.len() < 3 {
            separators.drain(..guard_count).collect()
        } else {
            alphabet.drain(..guard_count).collect()
        };

        Self {
            alphabet,
            separators,
            guards,
            salt: salt.to_vec(),
        }
    }

    /// Splits `code` into the numbers it carries.
    ///
    /// Returns `None` if the layout is malformed or any number does not fit
    /// into `u64`. A `Some` result is not yet canonical: callers must check
    /// that re-encoding yields `code`.
    pub(crate) fn decode(&self, code: &[u8]) -> Option<Vec<u64>> {
        let mut value = code;

        if let Some(i) = value.iter().position(|b| self.guards.contains(b)) {
            value = &value[i + 1..];
        }
        if let Some(i) = value.iter().rposition(|b| self.guards.contains(b)) {
            value = &value[..i];
        }

        let (&lottery, rest) = value.split_first()?;
        if rest.is_empty() {
            return None;
        }

        let mut alphabet = self.alphabet.clone();
        rest.split(|b| self.separators.contains(b))
            .map(|segment| {
                let mut key = Vec::with_capacity(1 + self.salt.len() + alphabet.len());
                key.push(lottery);
                key.extend_from_slice(&self.salt);
                key.extend_from_slice(&alphabet);

                let len = alphabet.len();
                shuffle(&mut alphabet, &key[..len]);
                unhash(segment, &alphabet)
            })
            .collect()
    }
}

fn unhash(segment: &[u8], alphabet: &[u8]) -> Option<u64> {
    let base = alphabet.len() as u64;
    segment.iter().try_fold(0u64, |acc, b| {
        let digit = alphabet.iter().position(|a| a == b)? as u64;
        acc.checked_mul(base)?.checked_add(digit)
    })
}

/// Salted Fisher-Yates variant shared by every Hashids implementation.
fn shuffle(values: &mut [u8], salt: &[u8]) {
    if salt.is_empty() {
        return;
    }

    let (mut v, mut p) = (0usize, 0usize);
    for i in (1..values.len()).rev() {
        v %= salt.len();
        let n = salt[v] as usize;
        p += n;
        let j = (n + v + p) % i;
        values.swap(i, j);
        v += 1;
    }
}
