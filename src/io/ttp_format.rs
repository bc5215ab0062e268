//! Reader for the travelling thief benchmark text format.
//!
//! ```text
//! PROBLEM NAME:	a280-TTP
//! KNAPSACK DATA TYPE:	bounded strongly corr
//! DIMENSION:	280
//! NUMBER OF ITEMS:	279
//! CAPACITY OF KNAPSACK:	25936
//! MIN SPEED:	0.1
//! MAX SPEED:	1
//! RENTING RATIO:	5.61
//! EDGE_WEIGHT_TYPE:	CEIL_2D
//! NODE_COORD_SECTION	(INDEX, X, Y):
//! 1	288	149
//! ...
//! ITEMS SECTION	(INDEX, PROFIT, WEIGHT, ASSIGNED NODE NUMBER):
//! 1	101	1	2
//! ...
//! ```
//!
//! Node and item indices are 1-based in the file and 0-based in memory.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::distance::{Distances, EdgeWeight};
use crate::models::{City, InstanceError, Item, KnapsackParams, TtpInstance};

const NODE_SECTION: &str = "NODE_COORD_SECTION";
const ITEM_SECTION: &str = "ITEMS SECTION";

/// Header counts are untrusted; vectors grow past this as lines arrive.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Error raised while reading an instance file.
#[derive(Debug)]
pub enum ParseError {
    /// Reading the underlying source failed.
    Io(io::Error),
    /// A required header key never appeared before the node section.
    MissingHeader(&'static str),
    /// A section header was expected but not found.
    MissingSection(&'static str),
    /// The input ended inside a section.
    UnexpectedEof {
        /// Section being read.
        section: &'static str,
    },
    /// A data line has fewer fields than its section requires.
    MissingField {
        /// 1-based line number.
        line: usize,
    },
    /// A value could not be parsed as a number.
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// The offending text.
        value: String,
    },
    /// A node or item index is zero, out of range, or repeated.
    InvalidIndex {
        /// 1-based line number.
        line: usize,
        /// Index as written in the file.
        index: usize,
    },
    /// `EDGE_WEIGHT_TYPE` is neither `CEIL_2D` nor `EUC_2D`.
    UnsupportedEdgeWeight(String),
    /// The parsed data does not form a valid instance.
    Instance(InstanceError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "cannot read instance: {e}"),
            ParseError::MissingHeader(key) => write!(f, "missing header '{key}'"),
            ParseError::MissingSection(name) => write!(f, "expected section '{name}'"),
            ParseError::UnexpectedEof { section } => {
                write!(f, "unexpected end of input in {section}")
            }
            ParseError::MissingField { line } => write!(f, "line {line}: missing field"),
            ParseError::InvalidNumber { line, value } => {
                write!(f, "line {line}: cannot parse '{value}' as a number")
            }
            ParseError::InvalidIndex { line, index } => {
                write!(f, "line {line}: invalid or repeated index {index}")
            }
            ParseError::UnsupportedEdgeWeight(kind) => {
                write!(f, "unsupported EDGE_WEIGHT_TYPE '{kind}'")
            }
            ParseError::Instance(e) => write!(f, "invalid instance: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::Instance(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

impl From<InstanceError> for ParseError {
    fn from(e: InstanceError) -> Self {
        ParseError::Instance(e)
    }
}

/// Parses an instance from its text form.
///
/// # Examples
///
/// ```
/// use u_ttp::io::parse_ttp;
/// use u_ttp::models::ThiefProblem;
///
/// let text = "\
/// PROBLEM NAME:\ttiny-TTP
/// KNAPSACK DATA TYPE:\tuncorrelated
/// DIMENSION:\t3
/// NUMBER OF ITEMS:\t2
/// CAPACITY OF KNAPSACK:\t10
/// MIN SPEED:\t0.1
/// MAX SPEED:\t1
/// RENTING RATIO:\t0.5
/// EDGE_WEIGHT_TYPE:\tCEIL_2D
/// NODE_COORD_SECTION\t(INDEX, X, Y):
/// 1\t0\t0
/// 2\t3\t4
/// 3\t0\t4
/// ITEMS SECTION\t(INDEX, PROFIT, WEIGHT, ASSIGNED NODE NUMBER):
/// 1\t20\t3\t2
/// 2\t15\t5\t3
/// ";
/// let instance = parse_ttp(text).unwrap();
/// assert_eq!(instance.name(), "tiny-TTP");
/// assert_eq!(instance.num_cities(), 3);
/// assert_eq!(instance.availability(0), 1);
/// assert_eq!(instance.distance(0, 1), 5.0);
/// ```
pub fn parse_ttp(input: &str) -> Result<TtpInstance, ParseError> {
    read_ttp(input.as_bytes())
}

/// Reads an instance file from disk.
///
/// When the file carries no `PROBLEM NAME`, the file stem is used.
pub fn load_ttp<P: AsRef<Path>>(path: P) -> Result<TtpInstance, ParseError> {
    let path = path.as_ref();
    let instance = read_ttp(File::open(path)?)?;
    debug!(
        "loaded {}: {} cities, {} items",
        path.display(),
        instance.distances().size(),
        instance.items().len()
    );
    if instance.name().is_empty() {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(instance.with_name(stem));
    }
    Ok(instance)
}

/// Reads an instance from any byte source.
pub fn read_ttp<R: Read>(source: R) -> Result<TtpInstance, ParseError> {
    TtpReader::new(BufReader::new(source)).read_instance()
}

#[derive(Default)]
struct Header {
    name: Option<String>,
    knapsack_type: Option<String>,
    dimension: Option<usize>,
    num_items: Option<usize>,
    capacity: Option<i64>,
    min_speed: Option<f64>,
    max_speed: Option<f64>,
    rent_rate: Option<f64>,
    edge_weight: Option<String>,
}

struct TtpReader<R: BufRead> {
    reader: R,
    buffer: String,
    line_no: usize,
}

impl<R: BufRead> TtpReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line_no: 0,
        }
    }

    fn read_instance(&mut self) -> Result<TtpInstance, ParseError> {
        let header = self.read_header()?;

        let dimension = header.dimension.ok_or(ParseError::MissingHeader("DIMENSION"))?;
        let num_items = header
            .num_items
            .ok_or(ParseError::MissingHeader("NUMBER OF ITEMS"))?;
        let params = KnapsackParams {
            capacity: header
                .capacity
                .ok_or(ParseError::MissingHeader("CAPACITY OF KNAPSACK"))?,
            min_speed: header.min_speed.ok_or(ParseError::MissingHeader("MIN SPEED"))?,
            max_speed: header.max_speed.ok_or(ParseError::MissingHeader("MAX SPEED"))?,
            rent_rate: header
                .rent_rate
                .ok_or(ParseError::MissingHeader("RENTING RATIO"))?,
        };
        let rule = match header
            .edge_weight
            .as_deref()
            .ok_or(ParseError::MissingHeader("EDGE_WEIGHT_TYPE"))?
        {
            "CEIL_2D" => EdgeWeight::Ceil2d,
            "EUC_2D" => EdgeWeight::Nint2d,
            other => return Err(ParseError::UnsupportedEdgeWeight(other.to_string())),
        };

        let cities = self.read_nodes(dimension)?;
        self.expect_section(ITEM_SECTION)?;
        let items = self.read_items(num_items, dimension)?;

        let instance = TtpInstance::new(Distances::Coordinates { cities, rule }, items, params)?
            .with_name(header.name.unwrap_or_default())
            .with_knapsack_type(header.knapsack_type.unwrap_or_default());
        Ok(instance)
    }

    fn read_header(&mut self) -> Result<Header, ParseError> {
        let mut header = Header::default();
        loop {
            let Some(line) = self.next_line()? else {
                return Err(ParseError::MissingSection(NODE_SECTION));
            };
            if line.starts_with(NODE_SECTION) {
                return Ok(header);
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            let line_no = self.line_no;
            match key {
                "PROBLEM NAME" => header.name = Some(value.to_string()),
                "KNAPSACK DATA TYPE" => header.knapsack_type = Some(value.to_string()),
                "DIMENSION" => header.dimension = Some(parse_number(value, line_no)?),
                "NUMBER OF ITEMS" => header.num_items = Some(parse_number(value, line_no)?),
                "CAPACITY OF KNAPSACK" => header.capacity = Some(parse_number(value, line_no)?),
                "MIN SPEED" => header.min_speed = Some(parse_number(value, line_no)?),
                "MAX SPEED" => header.max_speed = Some(parse_number(value, line_no)?),
                "RENTING RATIO" => header.rent_rate = Some(parse_number(value, line_no)?),
                "EDGE_WEIGHT_TYPE" => header.edge_weight = Some(value.to_string()),
                _ => {}
            }
        }
    }

    fn read_nodes(&mut self, dimension: usize) -> Result<Vec<City>, ParseError> {
        let mut nodes = Vec::with_capacity(dimension.min(PREALLOC_LIMIT));
        let mut seen = HashSet::new();
        for _ in 0..dimension {
            let line = self.section_line(NODE_SECTION)?;
            let line_no = self.line_no;
            let mut fields = line.split_whitespace();
            let index: usize = next_field(&mut fields, line_no)?;
            let x: f64 = next_field(&mut fields, line_no)?;
            let y: f64 = next_field(&mut fields, line_no)?;

            check_index(&mut seen, index, dimension, line_no)?;
            nodes.push(City::new(index - 1, x, y));
        }
        nodes.sort_unstable_by_key(|c| c.id());
        Ok(nodes)
    }

    fn read_items(&mut self, num_items: usize, dimension: usize) -> Result<Vec<Item>, ParseError> {
        let mut items = Vec::with_capacity(num_items.min(PREALLOC_LIMIT));
        let mut seen = HashSet::new();
        for _ in 0..num_items {
            let line = self.section_line(ITEM_SECTION)?;
            let line_no = self.line_no;
            let mut fields = line.split_whitespace();
            let index: usize = next_field(&mut fields, line_no)?;
            let profit: i64 = next_field(&mut fields, line_no)?;
            let weight: i64 = next_field(&mut fields, line_no)?;
            let node: usize = next_field(&mut fields, line_no)?;
            if node == 0 || node > dimension {
                return Err(ParseError::InvalidIndex {
                    line: line_no,
                    index: node,
                });
            }

            check_index(&mut seen, index, num_items, line_no)?;
            items.push((index, Item::new(profit, weight, node - 1)));
        }
        items.sort_unstable_by_key(|&(index, _)| index);
        Ok(items.into_iter().map(|(_, item)| item).collect())
    }

    fn expect_section(&mut self, name: &'static str) -> Result<(), ParseError> {
        match self.next_line()? {
            Some(line) if line.starts_with(name) => Ok(()),
            _ => Err(ParseError::MissingSection(name)),
        }
    }

    fn section_line(&mut self, section: &'static str) -> Result<String, ParseError> {
        self.next_line()?
            .ok_or(ParseError::UnexpectedEof { section })
    }

    /// Next non-blank line, trimmed. `None` at end of input.
    fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let line = self.buffer.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
    }
}

fn parse_number<T: FromStr>(value: &str, line: usize) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

fn next_field<'a, T: FromStr>(
    fields: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<T, ParseError> {
    let value = fields.next().ok_or(ParseError::MissingField { line })?;
    parse_number(value, line)
}

/// Rejects a 1-based `index` that is zero, above `count`, or repeated.
fn check_index(
    seen: &mut HashSet<usize>,
    index: usize,
    count: usize,
    line: usize,
) -> Result<(), ParseError> {
    if index == 0 || index > count || !seen.insert(index) {
        return Err(ParseError::InvalidIndex { line, index });
    }
    Ok(())
}
