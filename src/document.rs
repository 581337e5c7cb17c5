//! Format-neutral document model.
//!
//! Report composition only talks to this module: headings, paragraphs,
//! tables of styled cells, hyperlinks and a branded page header. Every
//! paragraph carries an explicit [`Direction`], since the target formats
//! default to left-to-right whatever the script. A [`Renderer`] turns the
//! finished [`Document`] into bytes of one concrete format.

/// Writing direction of a paragraph or cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Latin scripts.
    LeftToRight,
    /// Arabic script.
    RightToLeft,
}

impl Direction {
    /// Whether this is right-to-left.
    pub fn is_rtl(self) -> bool {
        self == Self::RightToLeft
    }
}

/// Horizontal alignment of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Flush left.
    Left,
    /// Centred.
    Center,
    /// Flush right.
    Right,
}

/// Errors building or rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A table row whose column spans do not add up to the table width.
    #[error("table row spans {actual} columns, table has {expected}")]
    RowWidth {
        /// Table width.
        expected: usize,
        /// Sum of the row's spans.
        actual: usize,
    },
    /// A heading level outside 1..=6.
    #[error("unsupported heading level {0}")]
    HeadingLevel(u8),
    /// A header image that is not a usable PNG.
    #[error("invalid image '{name}': {reason}")]
    InvalidImage {
        /// Asset name.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Packaging the output container failed.
    #[error("failed to package document: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// Writing the output buffer failed.
    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),
}

/// A run of content inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// A line break within the paragraph.
    Break,
    /// A clickable external reference, rendered coloured and underlined.
    Hyperlink {
        /// Visible text.
        text: String,
        /// Target URL.
        url: String,
    },
}

/// A paragraph of inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Content in logical order.
    pub inlines: Vec<Inline>,
    /// Writing direction.
    pub direction: Direction,
    /// Horizontal alignment.
    pub alignment: Alignment,
    /// Heading level, if this paragraph is a heading.
    pub heading: Option<u8>,
    /// Use one-and-a-half line spacing.
    pub relaxed: bool,
}

impl Paragraph {
    /// An empty paragraph.
    pub fn new(direction: Direction, alignment: Alignment) -> Self {
        Self {
            inlines: Vec::new(),
            direction,
            alignment,
            heading: None,
            relaxed: false,
        }
    }

    /// A paragraph holding `text`; newlines become line breaks.
    pub fn text(text: &str, direction: Direction, alignment: Alignment) -> Self {
        let mut paragraph = Self::new(direction, alignment);
        paragraph.push_text(text);
        paragraph
    }

    /// Append text, turning each newline (`\n` or `\r\n`) into an
    /// [`Inline::Break`].
    pub fn push_text(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.inlines.push(Inline::Break);
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            if !line.is_empty() {
                self.inlines.push(Inline::Text(line.to_owned()));
            }
        }
    }

    /// Append a line break.
    pub fn push_break(&mut self) {
        self.inlines.push(Inline::Break);
    }

    /// Append a hyperlink run.
    pub fn push_hyperlink(&mut self, text: impl Into<String>, url: impl Into<String>) {
        self.inlines.push(Inline::Hyperlink {
            text: text.into(),
            url: url.into(),
        });
    }

    /// Switch to one-and-a-half line spacing.
    pub fn relaxed(mut self) -> Self {
        self.relaxed = true;
        self
    }

    /// Concatenated visible text, breaks as newlines.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            match inline {
                Inline::Text(text) | Inline::Hyperlink { text, .. } => out.push_str(text),
                Inline::Break => out.push('\n'),
            }
        }
        out
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Cell content.
    pub paragraph: Paragraph,
    /// Grey background fill.
    pub shaded: bool,
    /// Thin black border on all sides.
    pub bordered: bool,
    /// Number of grid columns this cell covers.
    pub span: usize,
}

impl Cell {
    /// A single-column, unstyled cell holding `text`.
    pub fn text(text: &str, direction: Direction, alignment: Alignment) -> Self {
        Self {
            paragraph: Paragraph::text(text, direction, alignment),
            shaded: false,
            bordered: false,
            span: 1,
        }
    }

    /// Fill the cell grey.
    pub fn shaded(mut self) -> Self {
        self.shaded = true;
        self
    }

    /// Draw a border around the cell.
    pub fn bordered(mut self) -> Self {
        self.bordered = true;
        self
    }

    /// Merge the cell across `columns` grid columns.
    pub fn spanning(mut self, columns: usize) -> Self {
        self.span = columns;
        self
    }

    /// Centre the cell content.
    pub fn centered(mut self) -> Self {
        self.paragraph.alignment = Alignment::Center;
        self
    }

    /// Append a line break then a hyperlink run.
    pub fn push_hyperlink(&mut self, text: impl Into<String>, url: impl Into<String>) {
        self.paragraph.push_break();
        self.paragraph.push_hyperlink(text, url);
    }
}

/// A grid of cells with a fixed column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: usize,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// An empty table `columns` wide.
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row of cells in display order.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::RowWidth`] if the cell spans do not add up
    /// to the table width.
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<(), DocumentError> {
        let actual = cells
            .iter()
            .try_fold(0_usize, |acc, c| acc.checked_add(c.span))
            .unwrap_or(usize::MAX);
        if actual != self.columns || cells.iter().any(|c| c.span == 0) {
            return Err(DocumentError::RowWidth {
                expected: self.columns,
                actual,
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Table width in grid columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}

/// A body block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A paragraph or heading.
    Paragraph(Paragraph),
    /// A table.
    Table(Table),
}

/// A PNG placed in the page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderImage {
    /// File name inside the output container.
    pub name: String,
    /// Raw PNG bytes.
    pub bytes: Vec<u8>,
    /// Display width in EMU.
    pub width_emu: u64,
    /// Display height in EMU, derived from the pixel aspect ratio.
    pub height_emu: u64,
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// English Metric Units per inch.
pub const EMU_PER_INCH: u64 = 914_400;

impl HeaderImage {
    /// Validate a PNG and scale it to `width_emu`, keeping its aspect ratio.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidImage`] if the bytes are not a PNG
    /// with a readable, non-degenerate IHDR chunk.
    pub fn png(
        name: impl Into<String>,
        bytes: Vec<u8>,
        width_emu: u64,
    ) -> Result<Self, DocumentError> {
        let name = name.into();
        let invalid = |reason| DocumentError::InvalidImage {
            name: name.clone(),
            reason,
        };
        if bytes.get(..8) != Some(&PNG_SIGNATURE[..]) {
            return Err(invalid("missing PNG signature"));
        }
        if bytes.get(12..16) != Some(&b"IHDR"[..]) {
            return Err(invalid("first chunk is not IHDR"));
        }
        let read_u32 = |range: std::ops::Range<usize>| {
            bytes
                .get(range)
                .and_then(|b| <[u8; 4]>::try_from(b).ok())
                .map(u32::from_be_bytes)
        };
        let (Some(px_width), Some(px_height)) = (read_u32(16..20), read_u32(20..24)) else {
            return Err(invalid("truncated IHDR chunk"));
        };
        if px_width == 0 || px_height == 0 {
            return Err(invalid("zero image dimension"));
        }
        let height_emu = width_emu
            .checked_mul(u64::from(px_height))
            .and_then(|v| v.checked_div(u64::from(px_width)))
            .ok_or_else(|| invalid("image dimensions overflow"))?;
        Ok(Self {
            name,
            bytes,
            width_emu,
            height_emu,
        })
    }
}

/// Page header: images on one line separated by a run of spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Images in display order.
    pub images: Vec<HeaderImage>,
    /// Spaces between consecutive images.
    pub gap: usize,
    /// Direction of the header line.
    pub direction: Direction,
}

/// A document under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    header: Option<Header>,
    blocks: Vec<Block>,
}

impl Document {
    /// An empty document; `title` goes into document metadata.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            header: None,
            blocks: Vec::new(),
        }
    }

    /// Append a heading.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::HeadingLevel`] unless `level` is in 1..=6.
    pub fn add_heading(
        &mut self,
        level: u8,
        text: &str,
        direction: Direction,
        alignment: Alignment,
    ) -> Result<(), DocumentError> {
        if !(1..=6).contains(&level) {
            return Err(DocumentError::HeadingLevel(level));
        }
        let mut paragraph = Paragraph::text(text, direction, alignment);
        paragraph.heading = Some(level);
        self.blocks.push(Block::Paragraph(paragraph));
        Ok(())
    }

    /// Append a paragraph.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Append a table.
    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Set the page header.
    pub fn set_header(&mut self, header: Header) {
        self.header = Some(header);
    }

    /// Metadata title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Page header, if set.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Body blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Headings as `(level, text)` in document order.
    pub fn headings(&self) -> impl Iterator<Item = (u8, String)> + '_ {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(p) => p.heading.map(|level| (level, p.plain_text())),
            Block::Table(_) => None,
        })
    }

    /// Tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }
}

/// Serialises a [`Document`] to one concrete file format.
pub trait Renderer: Send + Sync {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Render the whole document into memory.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if packaging fails.
    fn render(&self, document: &Document) -> Result<Vec<u8>, DocumentError>;
}
