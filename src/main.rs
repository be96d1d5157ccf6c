#![no_main]
#![no_std]

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::interrupt::{free, Mutex};
use cortex_m::peripheral::NVIC;
use cortex_m_rt::entry;
use embedded_hal::delay::DelayNs;
use panic_halt as _;

use hal::{
    gpio::{Edge, ExtiPin},
    interrupt, pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use stir_cannula::{
    app::CommandLoop,
    config::{CannulaConfig, StirConfig, WaitConfig, HOME_DEBOUNCE_US},
    control::{
        CompletionWait, Dispatcher, HomingObserver, PositionController, SensorMailbox,
        VelocityController,
    },
    hw::{BoardPins, CycleDelay, HomeSensor, InputLine, SerialPort, SysDelay},
};

static HOME_EVENTS: SensorMailbox = SensorMailbox::new();
static HOMING: Mutex<RefCell<Option<(HomingObserver<HomeSensor>, CycleDelay)>>> =
    Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let sysclk_hz = clocks.sysclk().raw();

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOC, dp.GPIOD);

    // USART1 (commands + status)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    let mut usart = SerialPort::new(serial);

    // SysTick delay
    let mut delay = SysDelay::new(cortex_m::delay::Delay::new(cp.SYST, sysclk_hz));

    // Home switch on EXTI6, both edges
    let mut syscfg = dp.SYSCFG;
    let mut exti = dp.EXTI;
    let mut home = pins.home;
    home.make_interrupt_source(&mut syscfg, &mut rcc.apb2);
    home.trigger_on_edge(&mut exti, Edge::RisingFalling);
    home.enable_interrupt(&mut exti);

    let mut observer = HomingObserver::new(InputLine::new(home), HOME_DEBOUNCE_US);
    HOME_EVENTS.post(observer.sample());
    free(|cs| {
        HOMING
            .borrow(cs)
            .replace(Some((observer, CycleDelay::new(sysclk_hz))));
    });
    unsafe { NVIC::unmask(pac::Interrupt::EXTI9_5) };

    // Axes
    let wait = CompletionWait::new(WaitConfig::default());
    let stir = VelocityController::new(pins.stir, StirConfig::default(), wait);
    let cannula =
        PositionController::new(pins.cannula, CannulaConfig::default(), wait, &HOME_EVENTS);
    let mut app = CommandLoop::new(Dispatcher::new(stir, cannula));

    usart.write_str("Stir/cannula controller\r\n");

    while let Err(e) = app.bring_up(&mut delay, &mut usart) {
        let _ = write!(usart, "Bring-up failed: {}, retrying\r\n", e);
        delay.delay_ms(1000);
    }

    loop {
        if let Some(byte) = usart.read_byte() {
            app.on_byte(&mut delay, &mut usart, byte);
        }
        app.idle();
    }
}

#[interrupt]
fn EXTI9_5() {
    free(|cs| {
        if let Some((observer, delay)) = HOMING.borrow(cs).borrow_mut().as_mut() {
            observer.sensor_mut().pin_mut().clear_interrupt_pending_bit();
            observer.on_edge(delay, &HOME_EVENTS);
        }
    });
}
