//! PCD (Point Cloud Data v0.7) decoder
//!
//! Supports `DATA ascii` and `DATA binary`. Requires `x y z` fields; a packed
//! `rgb`/`rgba` field is decoded into the point color. Other fields are skipped.

use contracts::{ContractError, Point, PointCloud, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataKind {
    Ascii,
    Binary,
}

#[derive(Debug, Clone)]
struct Field {
    name: String,
    size: usize,
    kind: char,
    count: usize,
}

#[derive(Debug)]
struct Header {
    fields: Vec<Field>,
    points: usize,
    data: DataKind,
}

impl Header {
    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    fn require(&self, name: &str) -> Result<usize, ContractError> {
        self.index_of(name)
            .ok_or_else(|| ContractError::point_cloud_decode(format!("missing field '{name}'")))
    }

    fn color_index(&self) -> Option<usize> {
        self.index_of("rgb").or_else(|| self.index_of("rgba"))
    }

    /// Byte offset of each field within a binary record
    fn byte_offsets(&self) -> Vec<usize> {
        let mut offset = 0;
        self.fields
            .iter()
            .map(|f| {
                let current = offset;
                offset += f.size * f.count;
                current
            })
            .collect()
    }

    /// Token index of each field within an ascii line
    fn value_offsets(&self) -> Vec<usize> {
        let mut offset: usize = 0;
        self.fields
            .iter()
            .map(|f| {
                let current = offset;
                offset = offset.saturating_add(f.count);
                current
            })
            .collect()
    }

    /// Bytes per binary record, `None` on overflow
    fn record_size(&self) -> Option<usize> {
        self.fields
            .iter()
            .try_fold(0usize, |acc, f| f.size.checked_mul(f.count)?.checked_add(acc))
    }
}

/// Decode a PCD payload
pub fn read_pcd(bytes: &[u8]) -> Result<PointCloud, ContractError> {
    let (header, body) = parse_header(bytes)?;
    let points = match header.data {
        DataKind::Ascii => decode_ascii(&header, body)?,
        DataKind::Binary => decode_binary(&header, body)?,
    };
    Ok(PointCloud { points })
}

fn parse_numbers(key: &str, values: &[&str]) -> Result<Vec<usize>, ContractError> {
    values
        .iter()
        .map(|v| {
            v.parse::<usize>().map_err(|_| {
                ContractError::point_cloud_decode(format!("invalid {key} value '{v}'"))
            })
        })
        .collect()
}

fn parse_header(bytes: &[u8]) -> Result<(Header, &[u8]), ContractError> {
    let mut names: Vec<String> = Vec::new();
    let mut sizes: Vec<usize> = Vec::new();
    let mut kinds: Vec<char> = Vec::new();
    let mut counts: Option<Vec<usize>> = None;
    let mut width: Option<usize> = None;
    let mut height: Option<usize> = None;
    let mut points: Option<usize> = None;

    let mut pos = 0;
    while pos < bytes.len() {
        let end = bytes[pos..]
            .iter()
            .position(|b| *b == b'\n')
            .map_or(bytes.len(), |i| pos + i);
        let line = std::str::from_utf8(&bytes[pos..end])
            .map_err(|_| ContractError::point_cloud_decode("header is not valid UTF-8"))?
            .trim();
        pos = (end + 1).min(bytes.len());

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let key = tokens.next().unwrap_or_default().to_ascii_uppercase();
        let values: Vec<&str> = tokens.collect();

        match key.as_str() {
            "VERSION" | "VIEWPOINT" => {}
            "FIELDS" => names = values.iter().map(|v| v.to_string()).collect(),
            "SIZE" => sizes = parse_numbers("SIZE", &values)?,
            "TYPE" => {
                kinds = values
                    .iter()
                    .map(|v| match *v {
                        "F" | "U" | "I" => Ok(v.chars().next().unwrap_or('F')),
                        other => Err(ContractError::point_cloud_decode(format!(
                            "invalid TYPE value '{other}'"
                        ))),
                    })
                    .collect::<Result<_, _>>()?
            }
            "COUNT" => counts = Some(parse_numbers("COUNT", &values)?),
            "WIDTH" => width = parse_numbers("WIDTH", &values)?.first().copied(),
            "HEIGHT" => height = parse_numbers("HEIGHT", &values)?.first().copied(),
            "POINTS" => points = parse_numbers("POINTS", &values)?.first().copied(),
            "DATA" => {
                let data = match values.first().copied() {
                    Some("ascii") => DataKind::Ascii,
                    Some("binary") => DataKind::Binary,
                    Some(other) => {
                        return Err(ContractError::point_cloud_decode(format!(
                            "unsupported DATA encoding '{other}'"
                        )))
                    }
                    None => return Err(ContractError::point_cloud_decode("DATA has no value")),
                };

                let counts = counts.unwrap_or_else(|| vec![1; names.len()]);
                if sizes.len() != names.len()
                    || kinds.len() != names.len()
                    || counts.len() != names.len()
                {
                    return Err(ContractError::point_cloud_decode(format!(
                        "FIELDS/SIZE/TYPE/COUNT length mismatch: {}/{}/{}/{}",
                        names.len(),
                        sizes.len(),
                        kinds.len(),
                        counts.len()
                    )));
                }

                let points = match (points, width, height) {
                    (Some(points), _, _) => points,
                    (None, Some(w), Some(h)) => w.checked_mul(h).ok_or_else(|| {
                        ContractError::point_cloud_decode(format!(
                            "WIDTH {w} x HEIGHT {h} overflows"
                        ))
                    })?,
                    _ => {
                        return Err(ContractError::point_cloud_decode(
                            "header declares neither POINTS nor WIDTH and HEIGHT",
                        ))
                    }
                };

                let fields = names
                    .into_iter()
                    .zip(sizes)
                    .zip(kinds)
                    .zip(counts)
                    .map(|(((name, size), kind), count)| Field {
                        name,
                        size,
                        kind,
                        count,
                    })
                    .collect();

                return Ok((
                    Header {
                        fields,
                        points,
                        data,
                    },
                    &bytes[pos..],
                ));
            }
            other => {
                return Err(ContractError::point_cloud_decode(format!(
                    "unknown header key '{other}'"
                )))
            }
        }
    }

    Err(ContractError::point_cloud_decode("header has no DATA line"))
}

fn unpack_color(packed: u32) -> [u8; 3] {
    [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8]
}

fn decode_ascii(header: &Header, body: &[u8]) -> Result<Vec<Point>, ContractError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| ContractError::point_cloud_decode("ascii body is not valid UTF-8"))?;
    let offsets = header.value_offsets();
    let (x, y, z) = (
        offsets[header.require("x")?],
        offsets[header.require("y")?],
        offsets[header.require("z")?],
    );
    let color = header
        .color_index()
        .map(|i| (offsets[i], header.fields[i].kind));

    let parse_f64 = |token: &str| {
        token
            .parse::<f64>()
            .map_err(|_| ContractError::point_cloud_decode(format!("invalid number '{token}'")))
    };

    // Every point takes at least two bytes of text
    let mut points = Vec::with_capacity(header.points.min(text.len() / 2));
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        if points.len() == header.points {
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let token = |index: usize| {
            tokens.get(index).copied().ok_or_else(|| {
                ContractError::point_cloud_decode(format!(
                    "point {} has {} values",
                    points.len(),
                    tokens.len()
                ))
            })
        };

        let position = Vector3 {
            x: parse_f64(token(x)?)?,
            y: parse_f64(token(y)?)?,
            z: parse_f64(token(z)?)?,
        };
        let color = match color {
            Some((index, 'F')) => {
                let packed = parse_f64(token(index)?)? as f32;
                Some(unpack_color(packed.to_bits()))
            }
            Some((index, _)) => {
                let raw = token(index)?;
                let packed = raw.parse::<u32>().map_err(|_| {
                    ContractError::point_cloud_decode(format!("invalid color '{raw}'"))
                })?;
                Some(unpack_color(packed))
            }
            None => None,
        };
        points.push(Point { position, color });
    }

    if points.len() != header.points {
        return Err(ContractError::point_cloud_decode(format!(
            "expected {} points, found {}",
            header.points,
            points.len()
        )));
    }
    Ok(points)
}

fn read_scalar(bytes: &[u8], kind: char) -> Result<f64, ContractError> {
    let value = match (kind, bytes.len()) {
        ('F', 4) => f64::from(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        ('F', 8) => f64::from_le_bytes(bytes.try_into().unwrap_or([0; 8])),
        ('U', 1) => f64::from(bytes[0]),
        ('U', 2) => f64::from(u16::from_le_bytes([bytes[0], bytes[1]])),
        ('U', 4) => f64::from(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        ('I', 1) => f64::from(bytes[0] as i8),
        ('I', 2) => f64::from(i16::from_le_bytes([bytes[0], bytes[1]])),
        ('I', 4) => f64::from(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        (kind, size) => {
            return Err(ContractError::point_cloud_decode(format!(
                "unsupported field type {kind}{size}"
            )))
        }
    };
    Ok(value)
}

fn decode_binary(header: &Header, body: &[u8]) -> Result<Vec<Point>, ContractError> {
    let record = header
        .record_size()
        .ok_or_else(|| ContractError::point_cloud_decode("binary record size overflows"))?;
    if record == 0 {
        return Err(ContractError::point_cloud_decode("binary record size is zero"));
    }
    let needed = record.checked_mul(header.points).ok_or_else(|| {
        ContractError::point_cloud_decode(format!(
            "{} points of {record} bytes overflow",
            header.points
        ))
    })?;
    if body.len() < needed {
        return Err(ContractError::point_cloud_decode(format!(
            "binary body has {} bytes, expected {needed}",
            body.len()
        )));
    }

    let offsets = header.byte_offsets();
    let scalar = |index: usize| {
        let field = &header.fields[index];
        (offsets[index], field.size, field.kind)
    };
    let (x, y, z) = (
        scalar(header.require("x")?),
        scalar(header.require("y")?),
        scalar(header.require("z")?),
    );
    let color = match header.color_index() {
        Some(index) if header.fields[index].size == 4 => Some(offsets[index]),
        Some(_) => {
            return Err(ContractError::point_cloud_decode(
                "packed color field must be 4 bytes",
            ))
        }
        None => None,
    };

    body[..needed]
        .chunks_exact(record)
        .map(|chunk| {
            let read = |(offset, size, kind): (usize, usize, char)| {
                read_scalar(&chunk[offset..offset + size], kind)
            };
            let position = Vector3 {
                x: read(x)?,
                y: read(y)?,
                z: read(z)?,
            };
            let color = color.map(|offset| {
                unpack_color(u32::from_le_bytes([
                    chunk[offset],
                    chunk[offset + 1],
                    chunk[offset + 2],
                    chunk[offset + 3],
                ]))
            });
            Ok(Point { position, color })
        })
        .collect()
}
