use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use swiftboy::SwiftBoy;

fn rom_with_program(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    rom[0x0147] = 0x00; // NoMapper
    rom[0x0148] = 0x00; // 32 KiB
    rom[0x0149] = 0x00; // no RAM
    rom
}

/// A tight loop exercising loads, ALU ops, and a conditional branch back
/// to the top: a representative hot path for instruction dispatch.
fn tight_loop_rom() -> Vec<u8> {
    rom_with_program(&[
        0x3E, 0x00, // LD A,$00
        0x06, 0x10, // LD B,$10
        0x0E, 0x20, // LD C,$20
        0x80, // ADD A,B
        0x81, // ADD A,C
        0x05, // DEC B
        0x20, 0xFB, // JR NZ,-5 (back to ADD A,B)
        0x18, 0xFE, // JR -2 (spin once loop is exhausted)
    ])
}

fn bench_cpu_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("swiftboy_cpu_step");

    group.bench_function("single_instruction", |b| {
        b.iter(|| {
            let mut gb = SwiftBoy::new();
            gb.load_cartridge(tight_loop_rom()).unwrap();
            gb.reset();
            let result = gb.step_instruction().unwrap();
            black_box(result);
        });
    });

    group.finish();
}

fn bench_cpu_multiple_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("swiftboy_cpu_multiple_steps");

    for step_count in [10, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(step_count),
            step_count,
            |b, &step_count| {
                b.iter(|| {
                    let mut gb = SwiftBoy::new();
                    gb.load_cartridge(tight_loop_rom()).unwrap();
                    gb.reset();
                    for _ in 0..step_count {
                        black_box(gb.step_instruction().unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_run_frame(c: &mut Criterion) {
    c.bench_function("swiftboy_run_frame", |b| {
        b.iter(|| {
            let mut gb = SwiftBoy::new();
            gb.load_cartridge(tight_loop_rom()).unwrap();
            gb.reset();
            let frame = gb.run_frame().unwrap();
            black_box(frame);
        });
    });
}

criterion_group!(
    benches,
    bench_cpu_step,
    bench_cpu_multiple_steps,
    bench_run_frame
);
criterion_main!(benches);
