fn main() {
    divan::main();
}

const STOPPED: &str = r#"*stopped,reason="breakpoint-hit",disp="keep",bkptno="1",frame={addr="0x0000555555555131",func="main",args=[{name="argc",value="1"},{name="argv",value="0x7fffffffe0b8"}],file="main.cpp",fullname="/home/user/project/main.cpp",line="10",arch="i386:x86-64"},thread-id="1",stopped-threads="all",core="3""#;

const REGISTERS: &str = r#"^done,register-names=["rax","rbx","rcx","rdx","rsi","rdi","rbp","rsp","r8","r9","r10","r11","r12","r13","r14","r15","rip","eflags","cs","ss","ds","es","fs","gs","","","","","","","","","","","","","","","","","fctrl","fstat","ftag","fiseg","fioff","foseg","fooff","fop"]"#;

#[divan::bench(name = "parse_stopped_record")]
fn parse_stopped_record() -> mi_parser::Record {
    mi_parser::parse_record(divan::black_box(STOPPED))
}

#[divan::bench(name = "parse_register_names")]
fn parse_register_names() -> mi_parser::Record {
    mi_parser::parse_record(divan::black_box(REGISTERS))
}

#[divan::bench(name = "decode_correlated_line")]
fn decode_correlated_line() -> mi_parser::Record {
    let line = divan::black_box(r#"120000000345^done,value="42""#);
    let (_, rest) = mi_parser::CorrelationId::decode(line).unwrap();
    mi_parser::parse_record(rest)
}

#[divan::bench(args = [10, 100])]
fn tokenize_stack(frames: usize) -> usize {
    let stack = (0..frames)
        .map(|level| format!(r#"frame={{level="{level}",addr="0x401136",func="f{level}",file="a.c",line="{level}"}}"#))
        .collect::<Vec<_>>()
        .join(",");
    let line = format!("stack=[{stack}]");

    mi_parser::Lexer::new(&line).count()
}
