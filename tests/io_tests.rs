use gbcmem::{
    registers::{
        REG_DIV, REG_DMA, REG_HDMA1, REG_HDMA2, REG_HDMA3, REG_HDMA4, REG_HDMA5, REG_IE,
        REG_KEY1, REG_NR52, REG_P1,
    },
    Error, Machine, MachineBuilder, Processor,
};

#[cfg(test)]
#[ctor::ctor]
fn init() {
    gbcmem::init_tracing();
}

fn dma_pattern(i: usize) -> u8 {
    (i as u8).wrapping_mul(7).wrapping_add(3)
}

fn rom() -> Vec<u8> {
    let mut rom = vec![0; 0x8000];
    for i in 0..160 {
        rom[0x1200 + i] = dma_pattern(i);
    }
    rom
}

fn get_machine() -> Machine {
    Machine::new(rom()).unwrap()
}

#[test]
fn test_div_write_resets_and_breaks() {
    let mut machine = get_machine();
    *machine.io.reg_mut(REG_DIV) = 0xAB;
    assert_eq!(machine.read8(REG_DIV), 0xAB);

    machine.write8(REG_DIV, 0x37).unwrap();
    assert_eq!(machine.read8(REG_DIV), 0x00);
    assert_eq!(machine.cpu.break_requests, 1);

    machine.write8(REG_DIV, 0x00).unwrap();
    assert_eq!(machine.read8(REG_DIV), 0x00);
    assert_eq!(machine.cpu.break_requests, 2);
}

#[test]
fn test_dma_copies_into_oam_and_charges_cycles() {
    let mut machine = get_machine();
    let cycles = machine.cpu.cycles();
    assert_eq!(machine.read8(REG_DMA), 0x00);

    machine.write8(REG_DMA, 0x12).unwrap();

    for i in 0..160 {
        assert_eq!(
            machine.read8(0xFE00 + i as u16),
            dma_pattern(i),
            "OAM byte {}",
            i
        );
    }
    assert_eq!(machine.cpu.cycles() - cycles, 671);
    assert_eq!(machine.read8(REG_DMA), 0x00);
}

#[test]
fn test_dma_register_keeps_prior_value() {
    let mut machine = get_machine();
    *machine.io.reg_mut(REG_DMA) = 0x5A;

    machine.write8(REG_DMA, 0x12).unwrap();
    assert_eq!(machine.read8(REG_DMA), 0x5A);
    assert_eq!(machine.memory.oam()[0], dma_pattern(0));
}

#[test]
fn test_dma_source_goes_through_the_bus() {
    let mut machine = get_machine();
    for i in 0..160u16 {
        // written through echo RAM, read back by DMA from work RAM
        machine.write8(0xE100 + i, 0xFF - i as u8).unwrap();
    }

    let sources = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let log = sources.clone();
    machine.add_read_hook(move |address, _| log.borrow_mut().push(address));

    machine.write8(REG_DMA, 0xC1).unwrap();

    assert_eq!(machine.memory.oam()[0], 0xFF);
    assert_eq!(machine.memory.oam()[159], 0xFF - 159);
    let expected: Vec<u16> = (0xC100..0xC1A0).collect();
    assert_eq!(*sources.borrow(), expected);
    assert_eq!(machine.cpu.cycles(), 671);
}

#[test]
fn test_speed_switch_toggles() {
    let mut machine = get_machine();
    assert_eq!(machine.speed_factor(), 1);
    assert_eq!(machine.read8(REG_KEY1), 0x00);

    machine.write8(REG_KEY1, 0x01).unwrap();
    assert_eq!(machine.read8(REG_KEY1), 0x80);
    assert_eq!(machine.speed_factor(), 2);
    assert!(machine.double_speed());

    machine.write8(REG_KEY1, 0x01).unwrap();
    assert_eq!(machine.read8(REG_KEY1), 0x00);
    assert_eq!(machine.speed_factor(), 1);
    assert!(!machine.double_speed());

    // the processor-side switch shares the same toggle
    machine.switch_speed();
    assert_eq!(machine.read8(REG_KEY1), 0x80);
    assert_eq!(machine.speed_factor(), 2);
}

#[test]
fn test_nr52_only_latches_bit_seven() {
    let mut machine = get_machine();

    machine.write8(REG_NR52, 0x7F).unwrap();
    assert_eq!(machine.read8(REG_NR52), 0x00);

    machine.write8(REG_NR52, 0x80).unwrap();
    assert_eq!(machine.read8(REG_NR52), 0x80);

    // clearing bit 7 is not honoured by the current handler
    machine.write8(REG_NR52, 0x00).unwrap();
    assert_eq!(machine.read8(REG_NR52), 0x80);
}

#[test]
fn test_hdma_writes_are_unsupported() {
    let mut machine = get_machine();

    for address in [REG_HDMA1, REG_HDMA2, REG_HDMA3, REG_HDMA4, REG_HDMA5] {
        let result = machine.write8(address, 0x42);
        assert_eq!(
            result,
            Err(Error::UnsupportedFeature {
                feature: "HDMA",
                address,
                value: 0x42,
            })
        );
        assert_eq!(machine.read8(address), 0x00);
    }

    // the machine is still usable afterwards
    machine.write8(0xC000, 0x01).unwrap();
    assert_eq!(machine.read8(0xC000), 0x01);
}

#[test]
fn test_hdma_error_propagates_from_word_write() {
    let mut machine = get_machine();
    let result = machine.write16(REG_HDMA1 - 1, 0x1234);
    assert!(matches!(
        result,
        Err(Error::UnsupportedFeature { address: REG_HDMA1, value: 0x12, .. })
    ));
    assert_eq!(machine.read8(REG_HDMA1 - 1), 0x34);
}

#[test]
fn test_joypad_is_a_stub() {
    let mut machine = get_machine();
    assert_eq!(machine.read8(REG_P1), 0x0F);

    machine.write8(REG_P1, 0x20).unwrap();
    assert_eq!(machine.read8(REG_P1), 0x0F);
    assert_eq!(machine.io.reg(REG_P1), 0x00);
}

#[test]
fn test_plain_registers_pass_through() {
    let mut machine = get_machine();

    machine.write8(0xFF40, 0x91).unwrap();
    assert_eq!(machine.read8(0xFF40), 0x91);
    assert_eq!(machine.io.reg(0xFF40), 0x91);

    machine.write8(REG_IE, 0x1F).unwrap();
    assert_eq!(machine.read8(REG_IE), 0x1F);
}

#[derive(Default)]
struct RecordingCpu {
    charged: Vec<u64>,
    breaks: u32,
}

impl Processor for RecordingCpu {
    fn incr_cycles(&mut self, cycles: u64) {
        self.charged.push(cycles);
    }

    fn break_now(&mut self) {
        self.breaks += 1;
    }
}

#[test]
fn test_custom_processor_sees_side_effects() {
    let mut machine = MachineBuilder::new(rom())
        .processor(RecordingCpu::default())
        .build()
        .unwrap();

    machine.write8(REG_DMA, 0x12).unwrap();
    machine.write8(REG_DIV, 0x01).unwrap();

    assert_eq!(machine.cpu.charged, vec![671]);
    assert_eq!(machine.cpu.breaks, 1);
}
