//! Built-in unit definitions, in the same format as user unit files.
//!
//! `name, base, factor, category`: one unit equals `factor` times `base`. A
//! unit whose base is its own name is a base unit. Factors are exact.

pub const BUILTIN_UNITS: &str = "\
# SI base units
m,      m,          1,              Length
kg,     kg,         1,              Mass
s,      s,          1,              Time
A,      A,          1,              Current
K,      K,          1,              Temperature
mol,    mol,        1,              Amount
cd,     cd,         1,              Luminosity
bit,    bit,        1,              Information

# Length
in,     m,          0.0254,         Length
ft,     m,          0.3048,         Length
yd,     m,          0.9144,         Length
mi,     m,          1609.344,       Length
nmi,    m,          1852,           Length
au,     m,          149597870700,   Length
ly,     m,          9460730472580800, Length

# Mass
g,      kg,         1/1000,         Mass
t,      kg,         1000,           Mass
lb,     kg,         0.45359237,     Mass
oz,     lb,         1/16,           Mass

# Time
min,    s,          60,             Time
h,      s,          3600,           Time
d,      s,          86400,          Time
yr,     s,          31556925.9747,  Time

# Area and volume
ha,     m^2,        10000,          Area
acre,   m^2,        4046.8564224,   Area
l,      m^3,        1/1000,         Volume
L,      m^3,        1/1000,         Volume
gal,    l,          3.785411784,    Volume

# Speed and acceleration
kph,    km/h,       1,              Speed
mph,    mi/h,       1,              Speed
knot,   nmi/h,      1,              Speed
c,      m/s,        299792458,      Speed
ga,     m/s^2,      9.80665,        Acceleration

# Force, energy, power
N,      kg*m/s^2,   1,              Force
dyn,    N,          1/100000,       Force
lbf,    N,          4.4482216152605, Force
J,      N*m,        1,              Energy
cal,    J,          4.184,          Energy
eV,     J,          1.602176634E-19, Energy
Wh,     J,          3600,           Energy
W,      J/s,        1,              Power
hp,     W,          745.69987158227022, Power

# Pressure
Pa,     N/m^2,      1,              Pressure
bar,    Pa,         100000,         Pressure
atm,    Pa,         101325,         Pressure
psi,    lbf/in^2,   1,              Pressure
mmHg,   Pa,         133.322387415,  Pressure

# Electricity
C,      A*s,        1,              Charge
V,      W/A,        1,              Voltage
ohm,    V/A,        1,              Resistance
F,      C/V,        1,              Capacitance

# Frequency and information
Hz,     1/s,        1,              Frequency
B,      bit,        8,              Information
";
