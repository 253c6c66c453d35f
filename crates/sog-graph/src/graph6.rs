//! Codec for the graph6 line format.
//!
//! A graph6 line is a size field followed by the upper triangle of the
//! adjacency matrix, read column by column (`x(0,1), x(0,2), x(1,2), x(0,3),
//! ...`) and packed six bits per printable byte (`value + 63`). The final
//! byte is padded with zero bits. Node counts up to 62 use a single byte,
//! counts up to 258047 use `~` plus three bytes, larger counts use `~~` plus
//! six bytes.

use sog_core::{ErrorInfo, SogError};

use crate::graph::{Edge, Graph};
use crate::ids::make_node;

/// Optional header that may precede a graph6 line.
pub const HEADER: &str = ">>graph6<<";

const BIAS: u8 = 63;
const MAX_BYTE: u8 = 126;
const SIZE_ESCAPE: u8 = 126;
const SHORT_MAX: u64 = 62;
const MEDIUM_MAX: u64 = 258_047;
const LONG_MAX: u64 = (1 << 36) - 1;

/// Decodes one graph6 line into a [`Graph`].
///
/// Leading and trailing whitespace is the caller's concern; the line must
/// consist solely of graph6 bytes, optionally preceded by [`HEADER`].
pub fn decode(line: &str) -> Result<Graph, SogError> {
    let (body, base) = match line.strip_prefix(HEADER) {
        Some(rest) => (rest.as_bytes(), HEADER.len()),
        None => (line.as_bytes(), 0),
    };
    let Some(&first) = body.first() else {
        return Err(decode_error("empty", "graph6 line contains no data"));
    };
    match first {
        b':' => {
            return Err(decode_error("unsupported-format", "sparse6 lines are not supported")
                .with_context("offset", base));
        }
        b'&' => {
            return Err(decode_error("unsupported-format", "digraph6 lines are not supported")
                .with_context("offset", base));
        }
        _ => {}
    }
    if let Some(offset) = body.iter().position(|byte| !(BIAS..=MAX_BYTE).contains(byte)) {
        let shown = char::from(body[offset]).escape_default().to_string();
        return Err(decode_error("invalid-char", "byte outside the graph6 range 63..=126")
            .with_context("offset", base + offset)
            .with_context("char", shown));
    }

    let (order, consumed) = decode_size(body, base)?;
    let data = &body[consumed..];
    let bit_count = triangle_bits(order);
    let expected = bit_count.div_ceil(6);
    let actual = data.len() as u128;
    if actual != expected {
        let (code, message) = if actual < expected {
            ("truncated", "adjacency data is shorter than the node count requires")
        } else {
            ("trailing-data", "adjacency data is longer than the node count requires")
        };
        return Err(decode_error(code, message)
            .with_context("order", order)
            .with_context("expected_bytes", expected)
            .with_context("actual_bytes", actual));
    }

    // `expected` fits the line, so the order is small enough for usize arithmetic.
    let order = order as usize;
    let bit_count = bit_count as usize;
    let padding = data.len() * 6 - bit_count;
    if padding > 0 {
        let last = data[data.len() - 1] - BIAS;
        let mask = (1u8 << padding) - 1;
        if last & mask != 0 {
            let offset = base + consumed + data.len() - 1;
            return Err(
                decode_error("non-zero-padding", "padding bits of the final byte must be zero")
                    .with_context("offset", offset),
            );
        }
    }

    let mut edges = Vec::new();
    let mut k = 0usize;
    for j in 1..order {
        for i in 0..j {
            let group = data[k / 6] - BIAS;
            if (group >> (5 - k % 6)) & 1 == 1 {
                edges.push(Edge::new(make_node(i), make_node(j)));
            }
            k += 1;
        }
    }
    Ok(Graph::from_trusted(order, edges))
}

/// Encodes a graph into its canonical graph6 line (shortest size field, no header).
pub fn encode(graph: &Graph) -> String {
    let order = graph.order() as u64;
    let mut bytes = encode_size(order);
    let bit_count = triangle_bits(order) as usize;
    let mut groups = vec![0u8; bit_count.div_ceil(6)];
    for edge in graph.edges() {
        let (u, v) = edge.endpoints();
        let (i, j) = (u.as_raw() as usize, v.as_raw() as usize);
        let k = j * (j - 1) / 2 + i;
        groups[k / 6] |= 1 << (5 - k % 6);
    }
    bytes.extend(groups.into_iter().map(|group| group + BIAS));
    bytes.into_iter().map(char::from).collect()
}

fn decode_size(body: &[u8], base: usize) -> Result<(u64, usize), SogError> {
    if body[0] != SIZE_ESCAPE {
        return Ok((u64::from(body[0] - BIAS), 1));
    }
    let (start, width, floor) = if body.get(1) == Some(&SIZE_ESCAPE) {
        (2, 6, MEDIUM_MAX)
    } else {
        (1, 3, SHORT_MAX)
    };
    let Some(digits) = body.get(start..start + width) else {
        return Err(decode_error("truncated-size", "size field ends before all of its bytes")
            .with_context("offset", base)
            .with_context("expected_bytes", start + width)
            .with_context("actual_bytes", body.len()));
    };
    let order = digits
        .iter()
        .fold(0u64, |acc, byte| (acc << 6) | u64::from(byte - BIAS));
    if order <= floor {
        return Err(decode_error("non-canonical-size", "size field uses a longer form than needed")
            .with_context("offset", base)
            .with_context("order", order));
    }
    Ok((order, start + width))
}

fn encode_size(order: u64) -> Vec<u8> {
    let digits = |width: u32| {
        (0..width)
            .rev()
            .map(move |idx| ((order >> (6 * idx)) & 0x3f) as u8 + BIAS)
    };
    if order <= SHORT_MAX {
        vec![order as u8 + BIAS]
    } else if order <= MEDIUM_MAX {
        std::iter::once(SIZE_ESCAPE).chain(digits(3)).collect()
    } else {
        debug_assert!(order <= LONG_MAX, "graph6 cannot express {order} nodes");
        [SIZE_ESCAPE, SIZE_ESCAPE].into_iter().chain(digits(6)).collect()
    }
}

fn triangle_bits(order: u64) -> u128 {
    let n = u128::from(order);
    n * n.saturating_sub(1) / 2
}

fn decode_error(code: &str, message: &str) -> SogError {
    SogError::Decode(ErrorInfo::new(code, message))
}
