use super::*;
use crate::{
	instruction::{CALCULATION_SLOT, RETURN_SLOT},
	lexer::Lexer,
};

fn parse_with(source: &str, options: ParserOptions) -> Result<AbstractSyntaxTree, ParseError> {
	Parser::new(Lexer::new(source).lex(), options).parse()
}

fn parse(source: &str) -> Result<AbstractSyntaxTree, ParseError> { parse_with(source, ParserOptions::default()) }

fn body(source: &str, function: &str) -> Vec<Instruction> {
	let ast = parse(source).unwrap();
	ast.function(function).unwrap().body_instructions().to_vec()
}

fn types(instructions: &[Instruction]) -> Vec<InstructionType> {
	instructions.iter().map(|instruction| instruction.r#type).collect()
}

fn error(source: &str) -> ParseErrorType { parse(source).unwrap_err().r#type }

const ADD: &str = "int add(int a, int b) { return a + b; }\nint main() { int r = add(2, 3); return r; }";

#[test]
fn add_lowers_to_prologue_compute_and_return() {
	use InstructionType::*;
	let ast = parse(ADD).unwrap();
	let add = ast.function("add").unwrap();
	assert_eq!(types(add.instructions()), [Declare, Pull, Declare, Pull, Assign, Add, Return]);
	let compute = &add.body_instructions()[1];
	assert_eq!(compute.operand1.name, RETURN_SLOT);
	assert_eq!(compute.operand2, VariableInfo::new("b", DataType::Int));
	assert_eq!(ast.entry_point.as_deref(), Some("main"));
}

#[test]
fn call_results_are_read_from_the_return_slot() {
	use InstructionType::*;
	let main = body(ADD, "main");
	assert_eq!(types(&main), [Declare, Push, Push, Call, Assign, Assign, Return]);
	assert_eq!(main[1].operand2, VariableInfo::literal("2", DataType::IntConst));
	assert_eq!(main[3].operand1.name, "add");
	assert_eq!(main[4].operand1.name, "r");
	assert_eq!(main[4].operand2.name, RETURN_SLOT);
}

#[test]
fn products_bind_tighter_than_sums() {
	use InstructionType::*;
	let main = body("void main() { int x; x = 1 + 2 * 3; }", "main");
	assert_eq!(types(&main), [Declare, Assign, Assign, Multiply, Add, Assign, Return]);
	assert_eq!(main[2].operand1.name, "%fcv1");
	assert_eq!(main[4].operand1.name, CALCULATION_SLOT);
	assert_eq!(main[4].operand2.name, "%fcv1");
	assert_eq!(main[5].operand2.name, CALCULATION_SLOT);

	let grouped = body("void main() { int x; x = (1 + 2) * 3; }", "main");
	assert_eq!(types(&grouped), [Declare, Assign, Add, Multiply, Assign, Return]);
}

#[test]
fn if_jump_skips_exactly_the_body() {
	use InstructionType::*;
	let main = body("int main() { int x = 0; if (x < 1) { x = 2; x = 3; } return x; }", "main");
	assert_eq!(types(&main), [Declare, Assign, Less, Jump, PushScope, Assign, Assign, PopScope, Assign, Return]);
	assert_eq!(main[3].jump_offset(), Some(5));
}

#[test]
fn while_loops_jump_back_to_the_condition() {
	use InstructionType::*;
	let main = body("int main() { int i = 0; while (i < 3) { i++; } return i; }", "main");
	assert_eq!(types(&main), [Declare, Assign, Less, Jump, PushScope, Add, PopScope, Jump, Assign, Return]);
	assert_eq!(main[3].jump_offset(), Some(5));
	assert_eq!(main[7].jump_offset(), Some(-5));
	assert_eq!(main[5].operand2, VariableInfo::literal("1", DataType::IntConst));
}

#[test]
fn else_branches_are_jumped_over() {
	use InstructionType::*;
	let main = body("int main() { int x = 1; if (x) { x = 2; } else { x = 3; } return x; }", "main");
	assert_eq!(types(&main), [
		Declare, Assign, NotEqual, Jump, PushScope, Assign, PopScope, Jump, PushScope, Assign, PopScope, Assign, Return
	]);
	assert_eq!(main[3].jump_offset(), Some(5));
	assert_eq!(main[7].jump_offset(), Some(4));
	assert_eq!(main[2].operand2, VariableInfo::literal("0", DataType::IntConst));
}

#[test]
fn scopes_stay_balanced() {
	let source = "int main() {
		int total = 0;
		for (int i = 0; i < 3; i++) {
			int y = i;
			if (y > 1) { total += y; } else if (y == 0) { { total -= 1; } }
			while (y < 2) { y++; }
		}
		return total;
	}";
	let mut depth = 0i32;
	for instruction in body(source, "main") {
		match instruction.r#type {
			InstructionType::PushScope => depth += 1,
			InstructionType::PopScope => depth -= 1,
			_ => {}
		}
		assert!(depth >= 0);
	}
	assert_eq!(depth, 0);
}

#[test]
fn calls_in_expressions_use_temporaries() {
	let main = body("int one() { return 1; } int main() { int r = one() + one(); return r; }", "main");
	let declared: Vec<_> = main
		.iter()
		.filter(|instruction| instruction.r#type == InstructionType::Declare)
		.map(|instruction| instruction.operand1.name.as_str())
		.collect();
	assert_eq!(declared, ["r", "$t0", "$t1"]);
	assert!(!main.iter().any(|instruction| instruction.operand1.name == CALCULATION_SLOT));
}

#[test]
fn functions_may_be_called_before_their_definition() {
	assert!(parse("int main() { return later(1); } int later(int x) { return x; }").is_ok());
}

#[test]
fn void_functions_get_an_implicit_return() {
	let main = body("void main() { int x = 1; }", "main");
	assert_eq!(main.last().map(|instruction| instruction.r#type), Some(InstructionType::Return));
	let early = body("void main() { return; }", "main");
	assert_eq!(types(&early), [InstructionType::Return]);
}

#[test]
fn extern_declarations_are_not_lowered() {
	let ast = parse("extern void WriteLine(void text);\nvoid main() { WriteLine(\"hi\"); }").unwrap();
	assert!(ast.function("WriteLine").is_none());
	let main = ast.function("main").unwrap();
	assert_eq!(types(main.body_instructions()), [InstructionType::Push, InstructionType::Call, InstructionType::Return]);
}

#[test]
fn pointers_lower_to_locations() {
	use InstructionType::*;
	let main = body("int main() { int x = 4; int& p = &x; int y = *p; return y; }", "main");
	assert_eq!(types(&main), [Declare, Assign, Declare, AssignLocation, Declare, Dereference, Assign, Assign, Return]);
	assert_eq!(main[2].operand1.data_type, DataType::Pointer);
	assert!(matches!(error("int main() { int x; int y = &x; }"), ParseErrorType::NotAPointer(name) if name == "y"));
	assert_eq!(error("int main() { int x; int& p = &x; p = p + p; }"), ParseErrorType::PointerOperator("+"));
}

#[test]
fn unused_functions_are_removed() {
	let source = "int unused() { return 1; }\nint helper() { return 2; }\nint main() { return helper(); }";
	let options = ParserOptions { remove_unused_symbols: true, ..Default::default() };
	let ast = parse_with(source, options.clone()).unwrap();
	let names: Vec<_> = ast.functions.iter().map(|function| function.name.as_str()).collect();
	assert_eq!(names, ["helper", "main"]);

	let lonely = parse_with("int main() { return 0; }", options).unwrap();
	assert!(lonely.entry_point().is_some());
	assert_eq!(parse(source).unwrap().functions.len(), 3);
}

#[test]
fn functions_called_from_removed_functions_are_kept() {
	let source = "int helper() { return 1; }\nint dead() { return helper(); }\nint main() { return 0; }";
	let options = ParserOptions { remove_unused_symbols: true, ..Default::default() };
	let ast = parse_with(source, options).unwrap();
	let names: Vec<_> = ast.functions.iter().map(|function| function.name.as_str()).collect();
	assert_eq!(names, ["helper", "main"]);
}

#[test]
fn structural_errors() {
	assert_eq!(error("int main() { return 0; "), ParseErrorType::UnbalancedBrackets { open: '{', close: '}' });
	assert_eq!(error("int main() { return (0]; }"), ParseErrorType::UnbalancedBrackets { open: '(', close: ']' });
	assert!(matches!(error("int x = 5;"), ParseErrorType::GlobalVariable(name) if name == "x"));
	assert!(matches!(error("int main() { int inner() { } }"), ParseErrorType::NestedFunction(_)));
	assert!(matches!(error("int f() { } int f() { }"), ParseErrorType::DuplicateFunction(_)));
	assert!(matches!(error("int f(int a, int a) { }"), ParseErrorType::DuplicateParameter(_)));
	assert_eq!(error("int main() { else { } }"), ParseErrorType::ElseWithoutIf);
	assert_eq!(error("int main() { struct s; }"), ParseErrorType::UserTypeDeclaration);
	assert!(matches!(error("int main() { string s = \"open; }"), ParseErrorType::InvalidToken(_)));
	assert_eq!(error("int main() { int x = 1 }"), ParseErrorType::ExpectedToken(";"));
}

#[test]
fn semantic_errors() {
	assert!(matches!(error("int main() { return y; }"), ParseErrorType::UndeclaredIdentifier(name) if name == "y"));
	assert!(matches!(error("int main() { int x; int x; }"), ParseErrorType::Redeclaration(_)));
	assert!(parse("int main() { int x; { int x; } return 0; }").is_ok());
	assert!(matches!(
		error("int add(int a, int b) { return a + b; } int main() { return add(1); }"),
		ParseErrorType::WrongArgumentCount { expected: 2, found: 1, .. }
	));
	assert!(matches!(error("void f() { } int main() { int x = f(); }"), ParseErrorType::VoidValue(_)));
	assert!(matches!(error("void main() { return 1; }"), ParseErrorType::ReturnFromVoid(_)));
	assert!(matches!(error("int f() { return 1; } int main() { int x = f; }"), ParseErrorType::FunctionNotCalled(_)));
	assert_eq!(error("int main() { int x = 1 < 2; }"), ParseErrorType::ComparisonOutsideCondition);
	assert!(matches!(error("int main() { int x = 5 % 2; }"), ParseErrorType::UnsupportedOperator(op) if op == "%"));
	assert_eq!(error("int main() { int x; x + 1; }"), ParseErrorType::ExpectedToken("="));
}

#[test]
fn strings_only_mix_with_strings() {
	assert!(parse("string main() { string s = \"a\"; s = s + \"b\"; return s; }").is_ok());
	assert_eq!(
		error("int main() { string s = \"a\"; s = s + 1; }"),
		ParseErrorType::StringOperand { left: DataType::String, right: DataType::Int }
	);
	assert_eq!(error("int main() { string s = \"a\"; s = s - \"b\"; }"), ParseErrorType::StringOperator("-"));
	let line = parse("int main() {\n\tstring s;\n\ts = 5;\n}").unwrap_err().line;
	assert_eq!(line, 3);
}

#[test]
fn strict_mode_rejects_implicit_conversions() {
	let source = "int main() { float f = 1; return 0; }";
	assert!(parse(source).is_ok());
	let options = ParserOptions { disable_implicit_conversion: true, ..Default::default() };
	assert_eq!(
		parse_with(source, options.clone()).unwrap_err().r#type,
		ParseErrorType::ImplicitConversion { from: DataType::Int, to: DataType::Float }
	);
	assert!(parse_with("int main() { float f = 1.5; return 0; }", options).is_ok());
}

#[test]
fn optimizer_runs_when_enabled() {
	let source = "int add(int a, int b) { return a + b; } int main() { int x = 2; return add(x + 1, 3); }";
	let options = ParserOptions { optimize_instructions: true, ..Default::default() };
	let plain = parse(source).unwrap();
	let optimized = parse_with(source, options).unwrap();
	let length = |ast: &AbstractSyntaxTree| ast.function("main").map_or(0, |main| main.instructions().len());
	assert!(length(&optimized) <= length(&plain));
}
