use abc_mini_netlist::{Design, EXDC_NAME, GrowVec, LatchInit};
use indexmap::IndexMap;

use crate::{
    ParseError,
    line::{Directive, Line, tokenize},
    lower::lower,
    module::{LatchDecl, Module, NamesDecl, PortDirection, ResetDecl, SubcktDecl},
    preparse::split_logical_lines,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Empty,
    Preparsed,
    InterfacesScanned,
    Parsed,
}

/// The table that rows following a directive belong to.
#[derive(Debug, Clone, Copy)]
enum Table {
    Names(usize),
    Reset(usize),
}

/// State of one import. Owns the text, the tokenized lines and every model read so far.
#[derive(Debug)]
pub(crate) struct Manager {
    filename: Option<String>,
    buffer: Option<String>,
    lines: GrowVec<Line>,
    design: Option<Design>,
    models: GrowVec<Module>,
    /// Indices into `models` of the `.model` headers, by name.
    model_names: IndexMap<String, usize>,
    current: Option<usize>,
    error: Option<String>,
    /// Properties read from `.ltlformula` lines, waiting for the root network to exist.
    ltl_properties: GrowVec<String>,
    stage: Stage,
}

impl Manager {
    pub fn new(filename: Option<&str>) -> Self {
        Manager {
            filename: filename.map(str::to_owned),
            buffer: None,
            lines: GrowVec::new(),
            design: None,
            models: GrowVec::new(),
            model_names: IndexMap::new(),
            current: None,
            error: None,
            ltl_properties: GrowVec::new(),
            stage: Stage::Empty,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Records `error` as the current error, replacing any earlier one.
    pub fn set_error(&mut self, error: &ParseError) {
        self.error = Some(error.to_string());
    }

    pub fn take_ltl_properties(&mut self) -> GrowVec<String> {
        std::mem::take(&mut self.ltl_properties)
    }

    fn advance(&mut self, stage: Stage) {
        tracing::debug!(from = ?self.stage, to = ?stage, "import stage");
        self.stage = stage;
    }

    /// Runs every parsing stage and returns the design with one network per model.
    pub fn read(&mut self, text: &str) -> Result<Design, ParseError> {
        self.preparse(text)?;
        self.read_interfaces()?;
        self.parse()?;
        match self.design.take() {
            Some(design) => Ok(design),
            None => unreachable!(),
        }
    }

    pub fn preparse(&mut self, text: &str) -> Result<(), ParseError> {
        assert_eq!(self.stage, Stage::Empty);
        let buffer = self.buffer.insert(text.to_owned());
        let mut lines = GrowVec::new();
        for line in &split_logical_lines(buffer) {
            lines.push(tokenize(line)?);
        }
        if cfg!(feature = "trace") {
            eprintln!(">preparse: {} logical lines", lines.len());
        }
        self.lines = lines;
        self.advance(Stage::Preparsed);
        Ok(())
    }

    /// Creates a skeleton for every model: its name, ports and the extent of its body.
    pub fn read_interfaces(&mut self) -> Result<(), ParseError> {
        assert_eq!(self.stage, Stage::Preparsed);
        for (index, line) in self.lines.iter().enumerate() {
            let Some(directive) = &line.directive else {
                if self.current.is_none() {
                    return Err(ParseError::at(line.number, "table row outside of a model"));
                }
                continue;
            };
            if *directive == Directive::Model {
                if let Some(open) = self.current {
                    let name = &self.models[open].name;
                    return Err(ParseError::at(line.number, format!("model \"{name}\" is not terminated with .end")));
                }
                let [name] = line.args.as_slice() else {
                    return Err(ParseError::at(line.number, ".model must be followed by exactly one model name"));
                };
                if self.model_names.contains_key(name) {
                    return Err(ParseError::at(line.number, format!("model \"{name}\" is defined twice")));
                }
                self.model_names.insert(name.clone(), self.models.len());
                self.current = Some(self.models.len());
                self.models.push(Module::new(name.clone(), line.number, index + 1));
                continue;
            }
            let Some(open) = self.current else {
                return Err(ParseError::at(line.number, "directive outside of a model"));
            };
            match directive {
                Directive::Inputs => self.models[open].inputs.extend(line.args.iter().cloned()),
                Directive::Outputs => self.models[open].outputs.extend(line.args.iter().cloned()),
                Directive::Blackbox => self.models[open].blackbox = true,
                Directive::Exdc => {
                    self.models[open].body.end = index;
                    let mut exdc = Module::new(EXDC_NAME, line.number, index + 1);
                    exdc.inputs = self.models[open].inputs.clone();
                    exdc.outputs = self.models[open].outputs.clone();
                    self.current = Some(self.models.len());
                    self.models.push(exdc);
                }
                Directive::End => {
                    self.models[open].body.end = index;
                    self.current = None;
                }
                _ => (),
            }
        }
        if let Some(open) = self.current {
            let module = &self.models[open];
            return Err(ParseError::at(
                module.header_line,
                format!("model \"{}\" is not terminated with .end", module.name),
            ));
        }
        if self.models.is_empty() {
            return Err(ParseError::Input("the input contains no models".into()));
        }
        if cfg!(feature = "trace") {
            eprintln!(">interfaces: {} models", self.models.len());
        }
        self.advance(Stage::InterfacesScanned);
        Ok(())
    }

    /// Reads the bodies of all models and lowers each of them into a network of the design.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        assert_eq!(self.stage, Stage::InterfacesScanned);
        for index in 0..self.models.len() {
            self.current = Some(index);
            self.parse_body(index)?;
        }
        self.current = None;
        let mut design = Design::new(self.filename.clone().unwrap_or_default());
        for module in &mut self.models {
            module.network = Some(lower(module)?);
            if let Some(latch) = module.reset_latch {
                tracing::debug!(model = module.name.as_str(), %latch, "created reset latch");
            }
        }
        for module in &mut self.models {
            if let Some(network) = module.network.take() {
                design.add_module(network);
            }
        }
        if cfg!(feature = "trace") {
            eprintln!(">parse: {} networks", design.modules().len());
        }
        self.design = Some(design);
        self.advance(Stage::Parsed);
        Ok(())
    }

    fn parse_body(&mut self, index: usize) -> Result<(), ParseError> {
        let body = self.models[index].body.clone();
        let mut table = None;
        for line in &self.lines.as_slice()[body] {
            let Some(directive) = &line.directive else {
                match table {
                    Some(Table::Names(names)) => {
                        let names = &mut self.models[index].names[names];
                        let row = parse_cover_row(line, names)?;
                        names.cover.push(row);
                    }
                    Some(Table::Reset(reset)) => {
                        let reset = &mut self.models[index].resets[reset];
                        reset.value = Some(parse_reset_row(line, reset)?);
                    }
                    None => return Err(ParseError::at(line.number, "table row outside of a .names or .reset table")),
                }
                continue;
            };
            close_table(&self.models[index], table.take())?;
            match directive {
                Directive::Names => {
                    let module = &mut self.models[index];
                    table = Some(Table::Names(module.names.len()));
                    module.names.push(parse_names(line)?);
                }
                Directive::Reset => {
                    let module = &mut self.models[index];
                    table = Some(Table::Reset(module.resets.len()));
                    module.resets.push(parse_reset(line)?);
                }
                Directive::Latch => {
                    let latch = parse_latch(line)?;
                    self.models[index].latches.push(latch);
                }
                Directive::Subckt => {
                    let subckt = parse_subckt(line, &self.models, &self.model_names)?;
                    self.models[index].subckts.push(subckt);
                }
                Directive::LtlFormula => self.ltl_properties.push(line.args.join(" ")),
                Directive::Other(keyword) => {
                    tracing::warn!(line = line.number, "skipping unsupported directive .{keyword}");
                }
                Directive::Model | Directive::Inputs | Directive::Outputs | Directive::Blackbox => (),
                Directive::Exdc | Directive::End => (),
            }
        }
        close_table(&self.models[index], table)
    }
}

/// Fails if `table` is a `.reset` that ended without its value row.
fn close_table(module: &Module, table: Option<Table>) -> Result<(), ParseError> {
    if let Some(Table::Reset(reset)) = table {
        let reset = &module.resets[reset];
        if reset.value.is_none() {
            return Err(ParseError::at(reset.line, format!("reset of \"{}\" has no value row", reset.latch)));
        }
    }
    Ok(())
}

fn parse_names(line: &Line) -> Result<NamesDecl, ParseError> {
    let Some((output, inputs)) = line.args.split_last() else {
        return Err(ParseError::at(line.number, ".names must name at least the driven signal"));
    };
    Ok(NamesDecl { inputs: inputs.to_vec(), output: output.clone(), cover: GrowVec::new() })
}

fn parse_output_value(line: &Line, value: &str) -> Result<(), ParseError> {
    match value {
        "0" | "1" => Ok(()),
        _ => Err(ParseError::at(line.number, format!("output value \"{value}\" is not 0 or 1"))),
    }
}

fn parse_cover_row(line: &Line, names: &NamesDecl) -> Result<String, ParseError> {
    let width = names.inputs.len();
    match (width, line.args.as_slice()) {
        (0, [output]) => parse_output_value(line, output)?,
        (width, [inputs, output]) if width > 0 => {
            if inputs.len() != width {
                return Err(ParseError::at(
                    line.number,
                    format!(
                        "cover row \"{inputs}\" has {} literals, but \"{}\" has {width} fan-ins",
                        inputs.len(),
                        names.output
                    ),
                ));
            }
            if let Some(literal) = inputs.chars().find(|literal| !matches!(literal, '0' | '1' | '-')) {
                return Err(ParseError::at(line.number, format!("cover row \"{inputs}\" contains literal '{literal}'")));
            }
            parse_output_value(line, output)?;
        }
        _ => return Err(ParseError::at(line.number, format!("malformed cover row for \"{}\"", names.output))),
    }
    Ok(line.args.join(" "))
}

fn parse_reset(line: &Line) -> Result<ResetDecl, ParseError> {
    let [latch] = line.args.as_slice() else {
        return Err(ParseError::at(line.number, ".reset must name exactly one latch output"));
    };
    Ok(ResetDecl { line: line.number, latch: latch.clone(), value: None })
}

fn parse_reset_row(line: &Line, reset: &ResetDecl) -> Result<LatchInit, ParseError> {
    if reset.value.is_some() {
        return Err(ParseError::at(line.number, format!("reset of \"{}\" has more than one row", reset.latch)));
    }
    match line.args.as_slice() {
        [value] if value == "0" => Ok(LatchInit::Zero),
        [value] if value == "1" => Ok(LatchInit::One),
        _ => Err(ParseError::at(line.number, format!("reset value of \"{}\" must be 0 or 1", reset.latch))),
    }
}

fn parse_latch(line: &Line) -> Result<LatchDecl, ParseError> {
    let (input, output, trigger, init) = match line.args.as_slice() {
        [input, output] => (input, output, None, None),
        [input, output, init] => (input, output, None, Some(init)),
        [input, output, trigger, _control] => (input, output, Some(trigger), None),
        [input, output, trigger, _control, init] => (input, output, Some(trigger), Some(init)),
        _ => return Err(ParseError::at(line.number, ".latch takes 2 to 5 arguments")),
    };
    if let Some(trigger) = trigger {
        if !matches!(trigger.as_str(), "fe" | "re" | "ah" | "al" | "as") {
            return Err(ParseError::at(line.number, format!("unknown latch type \"{trigger}\"")));
        }
    }
    let init = match init {
        None => LatchInit::default(),
        Some(digit) => LatchInit::from_digit(digit).ok_or_else(|| {
            ParseError::at(line.number, format!("latch initial value \"{digit}\" is not 0, 1, 2 or 3"))
        })?,
    };
    Ok(LatchDecl { input: input.clone(), output: output.clone(), init })
}

fn parse_subckt(
    line: &Line,
    models: &GrowVec<Module>,
    model_names: &IndexMap<String, usize>,
) -> Result<SubcktDecl, ParseError> {
    let Some((model, bindings)) = line.args.split_first() else {
        return Err(ParseError::at(line.number, ".subckt must name the instantiated model"));
    };
    let Some(&target) = model_names.get(model) else {
        return Err(ParseError::at(line.number, format!("model \"{model}\" is not defined")));
    };
    let target = &models[target];
    let mut subckt = SubcktDecl { model: model.clone(), inputs: Vec::new(), outputs: Vec::new() };
    for binding in bindings {
        let pair = binding.split_once('=');
        let Some((formal, actual)) = pair.filter(|(formal, actual)| !formal.is_empty() && !actual.is_empty()) else {
            return Err(ParseError::at(line.number, format!("binding \"{binding}\" is not of the form formal=actual")));
        };
        let pair = (formal.to_owned(), actual.to_owned());
        match target.port_direction(formal) {
            Some(PortDirection::Input) => subckt.inputs.push(pair),
            Some(PortDirection::Output) => subckt.outputs.push(pair),
            None => {
                return Err(ParseError::at(line.number, format!("\"{formal}\" is not a port of model \"{model}\"")));
            }
        }
    }
    Ok(subckt)
}
